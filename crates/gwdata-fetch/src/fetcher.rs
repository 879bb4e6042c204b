//! Single-window fetch with retry and backoff.

use gwdata_types::{DateWindow, EntitySelector, FailureCause, FetchOutcome};
use tracing::{debug, info, warn};

use crate::request::{DEFAULT_PAGE_SIZE, WindowRequest};
use crate::{CancelSignal, FetchConfig, RetryPolicy, Transport, decode_csv};

/// Fetches and decodes one window, retrying transient failures.
#[derive(Debug, Clone)]
pub struct WindowFetcher<T> {
    transport: T,
    retry: RetryPolicy,
    page_size: u32,
}

impl<T: Transport> WindowFetcher<T> {
    /// Creates a fetcher over `transport` with the given retry policy.
    #[must_use]
    pub const fn new(transport: T, retry: RetryPolicy) -> Self {
        Self {
            transport,
            retry,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Creates a fetcher using the retry policy and page size from `config`.
    #[must_use]
    pub fn from_config(transport: T, config: &FetchConfig) -> Self {
        Self {
            transport,
            retry: config.retry.clone(),
            page_size: config.page_size,
        }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetches one window. Never fails; failures are reported in the outcome.
    pub async fn fetch(&self, selector: &EntitySelector, window: DateWindow) -> FetchOutcome {
        self.fetch_cancellable(selector, window, &CancelSignal::new())
            .await
    }

    /// Fetches one window, giving up with [`FailureCause::Cancelled`] once
    /// `cancel` fires.
    ///
    /// Non-200 statuses and transport errors are retried up to the policy's
    /// attempt limit. A body that fails to decode is reported immediately.
    pub async fn fetch_cancellable(
        &self,
        selector: &EntitySelector,
        window: DateWindow,
        cancel: &CancelSignal,
    ) -> FetchOutcome {
        let request = WindowRequest::new(selector, window, self.page_size);
        let attempts = self.retry.attempts();
        let mut last_cause = FailureCause::Cancelled;

        for attempt in 0..attempts {
            if cancel.is_cancelled() {
                return FetchOutcome::failure(window, FailureCause::Cancelled);
            }

            debug!(%window, attempt = attempt + 1, attempts, "requesting window");

            let cause = match self.transport.send(&request).await {
                Ok(response) if response.is_success() => {
                    match decode_csv(&response.body).await {
                        Ok(records) => {
                            info!(%window, records = records.len(), "✓ window fetched");
                            return FetchOutcome::Success { window, records };
                        }
                        Err(e) => FailureCause::Parse(e.to_string()),
                    }
                }
                Ok(response) => FailureCause::Http {
                    status: response.status,
                },
                Err(e) => FailureCause::Transport(e.to_string()),
            };

            if !cause.is_retryable() {
                warn!(%window, %cause, "✗ window failed without retry");
                return FetchOutcome::failure(window, cause);
            }

            warn!(%window, attempt = attempt + 1, attempts, %cause, "attempt failed");

            if attempt + 1 < attempts {
                let delay = self.retry.delay_for(attempt);
                debug!(%window, ?delay, "backing off");
                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    () = cancel.cancelled() => {
                        return FetchOutcome::failure(window, FailureCause::Cancelled);
                    }
                }
            }
            last_cause = cause;
        }

        warn!(%window, cause = %last_cause, "✗ no data for window");
        FetchOutcome::failure(window, last_cause)
    }
}
