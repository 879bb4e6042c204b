//! Per-window fetch outcomes.

use serde::{Deserialize, Serialize};

use crate::{DateWindow, RecordTable};

/// Why a window produced no records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureCause {
    /// The upstream answered with a non-success status on the last attempt.
    Http {
        /// HTTP status code.
        status: u16,
    },
    /// The request never produced a response (timeout, connect, body read).
    Transport(String),
    /// The body could not be decoded. Not retried.
    Parse(String),
    /// The run was cancelled before this window finished.
    Cancelled,
}

impl FailureCause {
    /// Returns true if another attempt could plausibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Transport(_))
    }
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http { status } => write!(f, "HTTP error {status}"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// A window that failed, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowFailure {
    /// The failed window.
    pub window: DateWindow,
    /// The terminal cause.
    pub cause: FailureCause,
}

/// Result of fetching one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The window was fetched and decoded.
    Success {
        /// The fetched window.
        window: DateWindow,
        /// Decoded records, possibly empty.
        records: RecordTable,
    },
    /// The window could not be fetched.
    Failure(WindowFailure),
}

impl FetchOutcome {
    /// Creates a failure outcome.
    #[must_use]
    pub const fn failure(window: DateWindow, cause: FailureCause) -> Self {
        Self::Failure(WindowFailure { window, cause })
    }

    /// Returns the window this outcome belongs to.
    #[must_use]
    pub const fn window(&self) -> DateWindow {
        match self {
            Self::Success { window, .. } => *window,
            Self::Failure(failure) => failure.window,
        }
    }

    /// Returns true for a successful outcome.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the number of decoded records (zero for failures).
    #[must_use]
    pub fn record_count(&self) -> usize {
        match self {
            Self::Success { records, .. } => records.len(),
            Self::Failure(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window() -> DateWindow {
        let d = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        DateWindow { start: d, end: d }
    }

    #[test]
    fn test_retryable_causes() {
        assert!(FailureCause::Http { status: 503 }.is_retryable());
        assert!(FailureCause::Http { status: 404 }.is_retryable());
        assert!(FailureCause::Transport("timeout".into()).is_retryable());
        assert!(!FailureCause::Parse("bad".into()).is_retryable());
        assert!(!FailureCause::Cancelled.is_retryable());
    }

    #[test]
    fn test_outcome_accessors() {
        let failed = FetchOutcome::failure(window(), FailureCause::Cancelled);
        assert_eq!(failed.window(), window());
        assert!(!failed.is_success());
        assert_eq!(failed.record_count(), 0);

        let ok = FetchOutcome::Success {
            window: window(),
            records: RecordTable::default(),
        };
        assert!(ok.is_success());
    }

    #[test]
    fn test_failure_cause_serializes_tagged() {
        let json = serde_json::to_string(&FailureCause::Http { status: 500 }).unwrap();
        assert_eq!(json, r#"{"kind":"http","detail":{"status":500}}"#);
    }
}
