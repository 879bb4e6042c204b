//! Merging and deduplication of windowed fetch results.
//!
//! - [`ResultAggregator`] - Folds per-window outcomes into one table
//! - [`AggregateResult`] - The merged table plus fetch statistics
//! - [`aggregate`] - One-shot convenience over a slice of outcomes

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gwdata-rs/gwdata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;

pub use aggregator::{AggregateResult, ResultAggregator, aggregate};
