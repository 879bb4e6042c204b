//! Date ranges and their partition into upstream-compliant query windows.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::DateRangeError;

/// Date format used on the wire and on the command line.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`DateRangeError::InvalidDate`] if the string is not a valid date.
pub fn parse_date(s: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| DateRangeError::InvalidDate(s.to_string()))
}

/// A range of dates for data retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns an iterator over windows of at most `step_days` days.
    ///
    /// # Errors
    ///
    /// Returns an error if `step_days` is zero.
    pub fn windows(&self, step_days: u32) -> Result<WindowIter, DateRangeError> {
        if step_days < 1 {
            return Err(DateRangeError::InvalidStep(step_days));
        }
        Ok(WindowIter {
            cursor: Some(self.start),
            end: self.end,
            step_days,
        })
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// One inclusive query window, no longer than the step it was cut with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    /// First day of the window (inclusive).
    pub start: NaiveDate,
    /// Last day of the window (inclusive).
    pub end: NaiveDate,
}

impl DateWindow {
    /// Number of days covered by the window.
    #[must_use]
    pub fn days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Start date formatted for the upstream API.
    #[must_use]
    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// End date formatted for the upstream API.
    #[must_use]
    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

/// Iterator over the windows of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct WindowIter {
    cursor: Option<NaiveDate>,
    end: NaiveDate,
    step_days: u32,
}

impl Iterator for WindowIter {
    type Item = DateWindow;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.cursor.filter(|c| *c <= self.end)?;

        let window_end = start
            .checked_add_days(Days::new(u64::from(self.step_days - 1)))
            .map_or(self.end, |d| d.min(self.end));

        self.cursor = window_end.succ_opt();
        Some(DateWindow {
            start,
            end: window_end,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.cursor {
            Some(c) if c <= self.end => {
                let days = (self.end - c).num_days() as usize + 1;
                days.div_ceil(self.step_days as usize)
            }
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WindowIter {}

/// Splits `[start, end]` into contiguous windows of at most `step_days` days.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use gwdata_types::partition;
///
/// let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2023, 1, 20).unwrap();
/// let windows = partition(start, end, 15).unwrap();
///
/// assert_eq!(windows.len(), 2);
/// assert_eq!(windows[0].end, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
/// assert_eq!(windows[1].start, NaiveDate::from_ymd_opt(2023, 1, 16).unwrap());
/// ```
///
/// # Errors
///
/// Returns an error if `start > end` or `step_days` is zero.
pub fn partition(
    start: NaiveDate,
    end: NaiveDate,
    step_days: u32,
) -> Result<Vec<DateWindow>, DateRangeError> {
    Ok(DateRange::new(start, end)?.windows(step_days)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_partition_example() {
        let windows = partition(date(2023, 1, 1), date(2023, 1, 20), 15).unwrap();
        assert_eq!(
            windows,
            vec![
                DateWindow {
                    start: date(2023, 1, 1),
                    end: date(2023, 1, 15)
                },
                DateWindow {
                    start: date(2023, 1, 16),
                    end: date(2023, 1, 20)
                },
            ]
        );
    }

    #[test]
    fn test_single_day() {
        let d = date(2024, 2, 29);
        for step in [1, 2, 15, 365] {
            let windows = partition(d, d, step).unwrap();
            assert_eq!(windows, vec![DateWindow { start: d, end: d }]);
        }
    }

    #[test]
    fn test_coverage_without_gaps_or_overlaps() {
        let start = date(2023, 12, 20);
        for span in 0..90u64 {
            let end = start.checked_add_days(Days::new(span)).unwrap();
            for step in 1..20u32 {
                let windows = partition(start, end, step).unwrap();

                assert_eq!(windows.first().unwrap().start, start);
                assert_eq!(windows.last().unwrap().end, end);
                for w in &windows {
                    assert!(w.start <= w.end);
                    assert!(w.days() <= step as usize);
                }
                for pair in windows.windows(2) {
                    assert_eq!(pair[0].end.succ_opt().unwrap(), pair[1].start);
                }
                let covered: usize = windows.iter().map(DateWindow::days).sum();
                assert_eq!(covered, span as usize + 1);
            }
        }
    }

    #[test]
    fn test_window_iter_exact_size() {
        let range = DateRange::new(date(2023, 1, 1), date(2023, 12, 31)).unwrap();
        let iter = range.windows(15).unwrap();
        assert_eq!(iter.len(), 25);
        assert_eq!(iter.count(), 25);
    }

    #[test]
    fn test_invalid_range() {
        let result = partition(date(2024, 1, 31), date(2024, 1, 1), 15);
        assert!(matches!(result, Err(DateRangeError::InvalidRange { .. })));
    }

    #[test]
    fn test_invalid_step() {
        let result = partition(date(2024, 1, 1), date(2024, 1, 31), 0);
        assert_eq!(result, Err(DateRangeError::InvalidStep(0)));
    }

    #[test]
    fn test_end_of_calendar() {
        let windows = partition(NaiveDate::MAX, NaiveDate::MAX, 15).unwrap();
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_window_params() {
        let w = DateWindow {
            start: date(2023, 1, 1),
            end: date(2023, 1, 15),
        };
        assert_eq!(w.start_param(), "2023-01-01");
        assert_eq!(w.end_param(), "2023-01-15");
        assert_eq!(w.days(), 15);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2023-01-01").unwrap(), date(2023, 1, 1));
        assert!(matches!(
            parse_date("01/01/2023"),
            Err(DateRangeError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_date_range_contains() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert!(range.contains(date(2024, 1, 15)));
        assert!(!range.contains(date(2024, 2, 1)));
        assert_eq!(range.total_days(), 31);
    }
}
