//! Request construction for the India-WRIS groundwater dataset endpoint.

use gwdata_types::{DateWindow, EntitySelector};

/// Dataset endpoint for groundwater levels.
pub const DEFAULT_ENDPOINT: &str = "https://indiawris.gov.in/Dataset/Ground Water Level";

/// Rows requested per page. The upstream caps a page at this size.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Media type requested from the upstream.
pub const ACCEPT_CSV: &str = "text/csv";

/// Everything needed to issue one request for one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRequest {
    /// Entity being queried.
    pub selector: EntitySelector,
    /// Date window being queried.
    pub window: DateWindow,
    /// Page index.
    pub page: u32,
    /// Page size.
    pub size: u32,
}

impl WindowRequest {
    /// Creates the first-page request for a window.
    #[must_use]
    pub fn new(selector: &EntitySelector, window: DateWindow, size: u32) -> Self {
        Self {
            selector: selector.clone(),
            window,
            page: 0,
            size,
        }
    }

    /// Query parameters in the order the upstream documents them.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use gwdata_fetch::request::WindowRequest;
    /// use gwdata_types::{DateWindow, EntitySelector};
    ///
    /// let selector = EntitySelector::new("Odisha", "Baleshwar", "CGWB");
    /// let window = DateWindow {
    ///     start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
    ///     end: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
    /// };
    /// let params = WindowRequest::new(&selector, window, 1000).params();
    /// assert_eq!(params[3], ("startdate", "2023-01-01".to_string()));
    /// ```
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = self
            .selector
            .params()
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        params.extend([
            ("startdate", self.window.start_param()),
            ("enddate", self.window.end_param()),
            ("download", "true".to_string()),
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ]);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_params() {
        let selector = EntitySelector::new("Odisha", "Baleshwar", "CGWB");
        let window = DateWindow {
            start: NaiveDate::from_ymd_opt(2023, 1, 16).unwrap(),
            end: NaiveDate::from_ymd_opt(2023, 1, 20).unwrap(),
        };
        let request = WindowRequest::new(&selector, window, DEFAULT_PAGE_SIZE);

        let params = request.params();
        let keys: Vec<_> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            [
                "stateName",
                "districtName",
                "agencyName",
                "startdate",
                "enddate",
                "download",
                "page",
                "size"
            ]
        );
        assert_eq!(params[4].1, "2023-01-20");
        assert_eq!(params[5].1, "true");
        assert_eq!(params[6].1, "0");
        assert_eq!(params[7].1, "1000");
    }
}
