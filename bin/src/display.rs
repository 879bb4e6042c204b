//! Display utilities and output formatting for the gwdata CLI.

use clap::ValueEnum;
use gwdata_lib::prelude::*;
use std::path::{Path, PathBuf};

/// Output format for downloaded data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    #[default]
    Csv,
    Tsv,
    Json,
    Ndjson,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(self) -> &'static str {
        self.output_format().extension()
    }

    pub(crate) const fn output_format(self) -> OutputFormat {
        match self {
            Self::Csv => OutputFormat::Csv,
            Self::Tsv => OutputFormat::Tsv,
            Self::Json => OutputFormat::Json,
            Self::Ndjson => OutputFormat::Ndjson,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Default output path for a format: `groundwater_data.<ext>`.
pub(crate) fn default_output(format: Format) -> PathBuf {
    Path::new(gwdata_lib::DEFAULT_OUTPUT).with_extension(format.extension())
}

/// Renders the end-of-run summary.
pub(crate) fn summary(report: &RunReport) -> String {
    let result = &report.result;
    let mut lines = vec![format!(
        "Fetched {} records from {} windows ({} duplicates removed, {} kept)",
        result.total_fetched,
        result.windows_succeeded,
        result.duplicates_removed,
        result.len()
    )];

    if !result.failures.is_empty() {
        lines.push(format!("{} windows failed:", result.failures.len()));
        for failure in &result.failures {
            lines.push(format!("  {}: {}", failure.window, failure.cause));
        }
    }

    match &report.output {
        Some(path) => lines.push(format!("Output written to: {}", path.display())),
        None => lines.push("No data fetched; nothing written".to_string()),
    }

    lines.join("\n")
}
