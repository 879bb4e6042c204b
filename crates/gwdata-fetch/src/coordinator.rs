//! Bounded-concurrency fetching of many windows.

use futures::stream::{self, StreamExt};
use gwdata_types::{DateWindow, EntitySelector, FailureCause, FetchOutcome};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{CancelSignal, Transport, WindowFetcher};

/// Receives per-window progress from a [`FetchCoordinator`].
///
/// Calls are made from the coordinator's task as outcomes arrive and must
/// not block.
pub trait ProgressCallback: Send + Sync {
    /// Total number of windows about to be fetched.
    fn set_total(&self, _total: u64) {}

    /// A window produced its outcome.
    fn window_done(&self, outcome: &FetchOutcome);

    /// All windows have an outcome.
    fn finish(&self) {}
}

/// A [`ProgressCallback`] that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn window_done(&self, _outcome: &FetchOutcome) {}
}

/// Drives a [`WindowFetcher`] over many windows, at most `concurrency` at a time.
pub struct FetchCoordinator<T> {
    fetcher: WindowFetcher<T>,
    concurrency: usize,
    progress: Arc<dyn ProgressCallback>,
}

impl<T> std::fmt::Debug for FetchCoordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCoordinator")
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> FetchCoordinator<T> {
    /// Creates a coordinator. A concurrency below one is treated as one.
    #[must_use]
    pub fn new(fetcher: WindowFetcher<T>, concurrency: usize) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
            progress: Arc::new(NullProgress),
        }
    }

    /// Sets the progress callback.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Returns the effective concurrency limit.
    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the fetcher.
    #[must_use]
    pub const fn fetcher(&self) -> &WindowFetcher<T> {
        &self.fetcher
    }

    /// Fetches every window without external cancellation.
    pub async fn run(&self, selector: &EntitySelector, windows: &[DateWindow]) -> Vec<FetchOutcome> {
        self.run_cancellable(selector, windows, &CancelSignal::new())
            .await
    }

    /// Fetches every window and returns one outcome per window, in input order.
    ///
    /// A failed window never stops its siblings. When `cancel` fires, fetches
    /// still in flight are dropped and every window without an outcome is
    /// reported as [`FailureCause::Cancelled`].
    pub async fn run_cancellable(
        &self,
        selector: &EntitySelector,
        windows: &[DateWindow],
        cancel: &CancelSignal,
    ) -> Vec<FetchOutcome> {
        info!(
            windows = windows.len(),
            concurrency = self.concurrency,
            attempts = self.fetcher.retry_policy().attempts(),
            %selector,
            "fetching windows"
        );
        self.progress.set_total(windows.len() as u64);

        let mut slots: Vec<Option<FetchOutcome>> = (0..windows.len()).map(|_| None).collect();
        let fetcher = &self.fetcher;

        let mut pending = stream::iter(windows.iter().copied().enumerate())
            .map(move |(index, window)| async move {
                let outcome = fetcher.fetch_cancellable(selector, window, cancel).await;
                (index, outcome)
            })
            .buffer_unordered(self.concurrency);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    warn!("cancellation requested, abandoning in-flight windows");
                    break;
                }
                next = pending.next() => match next {
                    Some((index, outcome)) => {
                        self.progress.window_done(&outcome);
                        slots[index] = Some(outcome);
                    }
                    None => break,
                },
            }
        }
        drop(pending);

        let outcomes: Vec<FetchOutcome> = slots
            .into_iter()
            .zip(windows)
            .map(|(slot, window)| {
                slot.unwrap_or_else(|| FetchOutcome::failure(*window, FailureCause::Cancelled))
            })
            .collect();

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            succeeded,
            failed = outcomes.len() - succeeded,
            "all windows accounted for"
        );
        self.progress.finish();
        outcomes
    }
}
