//! End-to-end retrieval: partition, fetch, merge, write.

use chrono::NaiveDate;
use gwdata_aggregate::{AggregateResult, aggregate};
use gwdata_fetch::{
    CancelSignal, FetchConfig, FetchCoordinator, HttpTransport, NullProgress, ProgressCallback,
    Transport, WindowFetcher,
};
use gwdata_format::{FormatError, OutputFormat, write_table_to_path};
use gwdata_types::{EntitySelector, GwError, partition};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Default window length accepted by the upstream.
pub const DEFAULT_STEP_DAYS: u32 = 15;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "groundwater_data.csv";

/// What to retrieve and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Entity to query.
    pub selector: EntitySelector,
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
    /// Maximum window length in days.
    pub step_days: u32,
    /// Output file.
    pub output: PathBuf,
    /// Output format.
    pub format: OutputFormat,
}

impl RunRequest {
    /// Creates a request with the default step, output path and format.
    #[must_use]
    pub fn new(selector: EntitySelector, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            selector,
            start,
            end,
            step_days: DEFAULT_STEP_DAYS,
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: OutputFormat::Csv,
        }
    }

    /// Sets the window length.
    #[must_use]
    pub const fn with_step_days(mut self, step_days: u32) -> Self {
        self.step_days = step_days;
        self
    }

    /// Sets the output file and format.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>, format: OutputFormat) -> Self {
        self.output = output.into();
        self.format = format;
        self
    }
}

/// How windows are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One window at a time.
    Sequential,
    /// Up to `concurrency` windows in flight.
    Parallel {
        /// Maximum windows in flight.
        concurrency: usize,
    },
}

impl Mode {
    /// Parallel mode bounded by [`FetchConfig::concurrency`].
    #[must_use]
    pub const fn from_config(config: &FetchConfig) -> Self {
        Self::Parallel {
            concurrency: config.concurrency,
        }
    }

    const fn concurrency(self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Parallel { concurrency } => concurrency,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Merged records and per-window statistics.
    pub result: AggregateResult,
    /// Where the records were written, or `None` when no window succeeded.
    pub output: Option<PathBuf>,
}

/// The partition-fetch-merge pipeline over a [`Transport`].
pub struct Pipeline<T> {
    transport: T,
    config: FetchConfig,
    progress: Arc<dyn ProgressCallback>,
    cancel: Arc<CancelSignal>,
}

impl<T> std::fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Pipeline<HttpTransport> {
    /// Creates a pipeline that talks to the configured endpoint over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn http(config: FetchConfig) -> Result<Self, GwError> {
        let transport = HttpTransport::new(&config).map_err(|e| GwError::Client(e.to_string()))?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> Pipeline<T> {
    /// Creates a pipeline over `transport`.
    #[must_use]
    pub fn new(transport: T, config: FetchConfig) -> Self {
        Self {
            transport,
            config,
            progress: Arc::new(NullProgress),
            cancel: CancelSignal::shared(),
        }
    }

    /// Sets the progress callback.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Sets the cancellation signal.
    #[must_use]
    pub fn with_cancel(mut self, cancel: Arc<CancelSignal>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs the whole pipeline and writes the merged records.
    ///
    /// Failed windows do not fail the run; they are listed in the report.
    /// Nothing is written when no window succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid range or step, before any request is
    /// made, or if the output cannot be written.
    pub async fn run(self, request: &RunRequest, mode: Mode) -> Result<RunReport, GwError> {
        let windows = partition(request.start, request.end, request.step_days)?;
        info!(
            windows = windows.len(),
            step_days = request.step_days,
            ?mode,
            "total date ranges to fetch"
        );

        let fetcher = WindowFetcher::from_config(self.transport, &self.config);
        let coordinator =
            FetchCoordinator::new(fetcher, mode.concurrency()).with_progress(self.progress);
        let outcomes = coordinator
            .run_cancellable(&request.selector, &windows, &self.cancel)
            .await;

        let result = aggregate(outcomes);
        if result.windows_succeeded == 0 {
            warn!(failed = result.failures.len(), "no data fetched");
            return Ok(RunReport {
                result,
                output: None,
            });
        }

        write_output(request.format, &result, &request.output).await?;
        if result.duplicates_removed > 0 {
            info!(removed = result.duplicates_removed, "removed duplicates");
        }

        Ok(RunReport {
            result,
            output: Some(request.output.clone()),
        })
    }
}

async fn write_output(
    format: OutputFormat,
    result: &AggregateResult,
    path: &Path,
) -> Result<(), GwError> {
    write_table_to_path(format, &result.table, path)
        .await
        .map_err(|e| match e {
            FormatError::Io(io) => GwError::Io(io),
            other => GwError::Format(other.to_string()),
        })
}

/// Fetches windows one at a time over HTTP and writes the merged result.
///
/// # Errors
///
/// See [`Pipeline::run`].
pub async fn scrape_sequential(
    request: &RunRequest,
    config: FetchConfig,
) -> Result<RunReport, GwError> {
    Pipeline::http(config)?.run(request, Mode::Sequential).await
}

/// Fetches up to `concurrency` windows at a time over HTTP and writes the
/// merged result.
///
/// `concurrency` replaces [`FetchConfig::concurrency`], so the connection
/// pool is sized to match.
///
/// # Errors
///
/// See [`Pipeline::run`].
pub async fn scrape_parallel(
    request: &RunRequest,
    config: FetchConfig,
    concurrency: usize,
) -> Result<RunReport, GwError> {
    let config = FetchConfig {
        concurrency,
        ..config
    };
    let mode = Mode::from_config(&config);
    Pipeline::http(config)?.run(request, mode).await
}
