//! HTTP client and windowed fetching for the gwdata groundwater-level retriever.
//!
//! This crate provides the fetch half of the pipeline:
//!
//! - [`request::WindowRequest`] - Query parameters for one window
//! - [`HttpTransport`] - Pooled HTTP client behind the [`Transport`] trait
//! - [`decode_csv`] - Response body decoding
//! - [`WindowFetcher`] - One window with retry, backoff and jitter
//! - [`FetchCoordinator`] - Many windows under a concurrency bound

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/gwdata-rs/gwdata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cancel;
mod client;
mod coordinator;
mod fetcher;
mod parse;
pub mod request;
mod retry;

#[cfg(test)]
mod testing;

pub use cancel::CancelSignal;
pub use client::{FetchConfig, HttpTransport, Transport, TransportError, TransportResponse};
pub use coordinator::{FetchCoordinator, NullProgress, ProgressCallback};
pub use fetcher::WindowFetcher;
pub use parse::{ParseError, decode_csv};
pub use retry::RetryPolicy;
