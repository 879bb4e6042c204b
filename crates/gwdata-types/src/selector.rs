//! Entity selection passed through to every request.

use serde::{Deserialize, Serialize};

/// Default reporting agency.
pub const DEFAULT_AGENCY: &str = "CGWB";

/// Identifies which monitoring entity a query targets.
///
/// The fields are forwarded verbatim as `stateName`, `districtName` and
/// `agencyName`. Nothing here is validated beyond what the upstream requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitySelector {
    /// State name (e.g. `Odisha`).
    pub state: String,
    /// District name (e.g. `Baleshwar`).
    pub district: String,
    /// Source agency (e.g. `CGWB`).
    pub agency: String,
}

impl EntitySelector {
    /// Creates a selector for the given state, district and agency.
    #[must_use]
    pub fn new(
        state: impl Into<String>,
        district: impl Into<String>,
        agency: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
            agency: agency.into(),
        }
    }

    /// Query parameters identifying this entity.
    #[must_use]
    pub fn params(&self) -> [(&'static str, &str); 3] {
        [
            ("stateName", self.state.as_str()),
            ("districtName", self.district.as_str()),
            ("agencyName", self.agency.as_str()),
        ]
    }
}

impl std::fmt::Display for EntitySelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({})", self.state, self.district, self.agency)
    }
}
