//! Error types for gwdata.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for gwdata operations.
pub type Result<T> = std::result::Result<T, GwError>;

/// Fatal errors that abort a whole retrieval run.
///
/// Per-window problems are not represented here; they travel as
/// [`FailureCause`](crate::FailureCause) values inside a
/// [`FetchOutcome`](crate::FetchOutcome).
#[derive(Error, Debug)]
pub enum GwError {
    /// Invalid date range or step size.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),

    /// I/O error while writing the sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output format error.
    #[error("Format error: {0}")]
    Format(String),
}

/// Error for invalid partition inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// Step size is smaller than one day.
    #[error("Invalid step size: {0} days (must be at least 1)")]
    InvalidStep(u32),

    /// A date string could not be parsed.
    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}
