//! Download command implementation.
//!
//! Fetches every window for one district, merges the rows and writes them in
//! the requested format.

use crate::display::{self, Format};
use anyhow::{Context, Result, bail};
use clap::Args;
use gwdata_lib::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Arguments for `gwdata download`.
#[derive(Args, Debug)]
pub(crate) struct DownloadArgs {
    /// State name as used by India-WRIS (e.g. Odisha)
    #[arg(long)]
    pub(crate) state: String,

    /// District name as used by India-WRIS (e.g. Baleshwar)
    #[arg(long)]
    pub(crate) district: String,

    /// Reporting agency
    #[arg(long, default_value = DEFAULT_AGENCY)]
    pub(crate) agency: String,

    /// Start date (YYYY-MM-DD)
    #[arg(short, long)]
    pub(crate) start: String,

    /// End date (YYYY-MM-DD)
    #[arg(short, long)]
    pub(crate) end: String,

    /// Maximum window length in days
    #[arg(long, default_value_t = gwdata_lib::DEFAULT_STEP_DAYS)]
    pub(crate) step_days: u32,

    /// Maximum concurrent windows
    #[arg(long, default_value_t = 4)]
    pub(crate) concurrency: usize,

    /// Fetch one window at a time
    #[arg(long, conflicts_with = "concurrency")]
    pub(crate) sequential: bool,

    /// Attempts per window, including the first (1 disables retries)
    #[arg(long, default_value_t = 3)]
    pub(crate) max_retries: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub(crate) timeout: u64,

    /// Output file path. Defaults to groundwater_data.<format>
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Csv)]
    pub(crate) format: Format,

    /// Exit with an error when no window returned data
    #[arg(long)]
    pub(crate) require_data: bool,

    /// Override the dataset endpoint
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
}

impl DownloadArgs {
    /// Output path, defaulting from the format.
    pub(crate) fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| display::default_output(self.format))
    }

    /// Scheduling mode; parallel runs take their bound from `config`.
    pub(crate) const fn mode(&self, config: &FetchConfig) -> Mode {
        if self.sequential {
            Mode::Sequential
        } else {
            Mode::from_config(config)
        }
    }

    pub(crate) fn fetch_config(&self) -> FetchConfig {
        let defaults = FetchConfig::default();
        let concurrency = if self.sequential {
            1
        } else {
            self.concurrency.max(1)
        };
        FetchConfig {
            endpoint: self.endpoint.clone().unwrap_or(defaults.endpoint),
            concurrency,
            timeout: Duration::from_secs(self.timeout),
            retry: RetryPolicy::default().with_max_attempts(self.max_retries),
            ..FetchConfig::default()
        }
    }

    pub(crate) fn run_request(&self) -> Result<RunRequest> {
        let start =
            parse_date(&self.start).with_context(|| format!("Invalid start date: {}", self.start))?;
        let end = parse_date(&self.end).with_context(|| format!("Invalid end date: {}", self.end))?;
        let selector = EntitySelector::new(&self.state, &self.district, &self.agency);

        Ok(RunRequest::new(selector, start, end)
            .with_step_days(self.step_days)
            .with_output(self.output_path(), self.format.output_format()))
    }
}

/// Progress bar advanced once per finished window.
#[derive(Debug)]
struct WindowProgress {
    bar: ProgressBar,
}

impl WindowProgress {
    fn new(quiet: bool, message: String) -> Result<Self> {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} windows ({percent}%) {msg}")
                    .context("Invalid progress template")?
                    .progress_chars("=>-"),
            );
            bar.set_message(message);
            bar
        };
        Ok(Self { bar })
    }
}

impl ProgressCallback for WindowProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
    }

    fn window_done(&self, outcome: &FetchOutcome) {
        if let FetchOutcome::Failure(failure) = outcome
            && failure.cause != FailureCause::Cancelled
        {
            self.bar
                .println(format!("  {} failed: {}", failure.window, failure.cause));
        }
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Download groundwater levels for one district.
pub(crate) async fn download(
    args: DownloadArgs,
    cancel: Arc<CancelSignal>,
    quiet: bool,
) -> Result<()> {
    let request = args.run_request()?;
    let config = args.fetch_config();
    let mode = args.mode(&config);

    let progress = WindowProgress::new(
        quiet,
        format!("{} {} -> {}", request.selector, request.start, request.end),
    )?;

    let pipeline = Pipeline::http(config)
        .context("Failed to create HTTP client")?
        .with_progress(Arc::new(progress))
        .with_cancel(cancel.clone());

    let report = pipeline
        .run(&request, mode)
        .await
        .context("Download failed")?;

    if !quiet {
        println!("{}", display::summary(&report));
    }

    if cancel.is_cancelled() {
        bail!("Download interrupted");
    }
    if args.require_data && report.result.all_failed() {
        bail!(
            "No data fetched for {} between {} and {}",
            request.selector,
            request.start,
            request.end
        );
    }

    Ok(())
}
