//! Core types for the gwdata groundwater-level retriever.
//!
//! This crate provides the fundamental data structures used throughout gwdata:
//!
//! - [`DateRange`] / [`DateWindow`] - Requested range and its query windows
//! - [`partition`] - Splits a range into windows no longer than the step size
//! - [`EntitySelector`] - State, district and agency forwarded to every request
//! - [`Record`] / [`RecordTable`] - Decoded tabular rows
//! - [`FetchOutcome`] - Per-window success or failure

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gwdata-rs/gwdata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod outcome;
mod record;
mod selector;
mod window;

pub use error::{DateRangeError, GwError, Result};
pub use outcome::{FailureCause, FetchOutcome, WindowFailure};
pub use record::{Record, RecordTable};
pub use selector::{DEFAULT_AGENCY, EntitySelector};
pub use window::{DATE_FORMAT, DateRange, DateWindow, WindowIter, parse_date, partition};
