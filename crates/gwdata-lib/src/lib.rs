//! Windowed, concurrent retrieval of India-WRIS groundwater-level data.
//!
//! This is a facade crate that re-exports functionality from the gwdata
//! workspace crates and adds the end-to-end [`pipeline`].
//!
//! # Quick Start
//!
//! ```ignore
//! use gwdata_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = RunRequest::new(
//!         EntitySelector::new("Odisha", "Baleshwar", DEFAULT_AGENCY),
//!         parse_date("2023-01-01")?,
//!         parse_date("2023-06-30")?,
//!     );
//!
//!     let report = scrape_parallel(&request, FetchConfig::default(), 4).await?;
//!     println!(
//!         "{} records, {} duplicates removed, {} windows failed",
//!         report.result.len(),
//!         report.result.duplicates_removed,
//!         report.result.failures.len(),
//!     );
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;

// Re-export core types
pub use gwdata_types::*;

// Re-export fetch functionality
pub use gwdata_fetch::{
    CancelSignal, FetchConfig, FetchCoordinator, HttpTransport, NullProgress, ParseError,
    ProgressCallback, RetryPolicy, Transport, TransportError, TransportResponse, WindowFetcher,
    decode_csv,
};

// Re-export aggregation
pub use gwdata_aggregate::{AggregateResult, ResultAggregator, aggregate};

// Re-export formatters
pub use gwdata_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat, write_table,
    write_table_to_path,
};

pub use pipeline::{
    DEFAULT_OUTPUT, DEFAULT_STEP_DAYS, Mode, Pipeline, RunReport, RunRequest, scrape_parallel,
    scrape_sequential,
};

/// Prelude module for convenient imports.
///
/// ```
/// use gwdata_lib::prelude::*;
/// ```
pub mod prelude {
    pub use gwdata_types::{
        DEFAULT_AGENCY, DateRange, DateRangeError, DateWindow, EntitySelector, FailureCause,
        FetchOutcome, GwError, Record, RecordTable, Result, parse_date, partition,
    };

    pub use gwdata_fetch::{CancelSignal, FetchConfig, ProgressCallback, RetryPolicy};

    pub use gwdata_aggregate::AggregateResult;

    pub use gwdata_format::OutputFormat;

    pub use crate::pipeline::{
        Mode, Pipeline, RunReport, RunRequest, scrape_parallel, scrape_sequential,
    };
}
