//! Output sinks for the gwdata groundwater-level retriever.
//!
//! This crate provides formatters for writing a merged record table:
//!
//! - [`CsvFormatter`] - CSV or TSV
//! - [`JsonFormatter`] - JSON array or NDJSON
//! - [`write_table_to_path`] - Writes a table to a file in any [`OutputFormat`]

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gwdata-rs/gwdata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod sink;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};
pub use sink::{write_table, write_table_to_path};
