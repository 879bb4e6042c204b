//! CLI command implementations.

pub(crate) mod download;
pub(crate) mod plan;
