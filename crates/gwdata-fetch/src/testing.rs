//! In-process transports for exercising the fetch pipeline without a network.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use gwdata_types::{DateWindow, EntitySelector};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::request::WindowRequest;
use crate::{RetryPolicy, Transport, TransportError, TransportResponse};

/// One scripted reply.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Reply(TransportResponse),
    Fail(TransportError),
}

impl Step {
    pub(crate) fn csv(body: &'static str) -> Self {
        Self::Reply(TransportResponse::new(200, body))
    }

    pub(crate) fn status(status: u16) -> Self {
        Self::Reply(TransportResponse::new(status, ""))
    }

    pub(crate) fn transport_error() -> Self {
        Self::Fail(TransportError::Connect("connection refused".into()))
    }

    fn into_result(self) -> Result<TransportResponse, TransportError> {
        match self {
            Self::Reply(response) => Ok(response),
            Self::Fail(e) => Err(e),
        }
    }
}

/// Replays a fixed sequence of replies, then repeats the fallback.
#[derive(Debug)]
pub(crate) struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    fallback: Step,
    calls: AtomicUsize,
    requests: Mutex<Vec<WindowRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            fallback: Step::status(599),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn repeating(step: Step) -> Self {
        Self {
            fallback: step,
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<WindowRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &WindowRequest) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        step.into_result()
    }
}

/// Answers each request by calling `F` with the requested window, after the
/// delay it returns.
pub(crate) struct WindowFnTransport<F> {
    respond: F,
}

impl<F> WindowFnTransport<F>
where
    F: Fn(DateWindow) -> (Duration, Step) + Send + Sync,
{
    pub(crate) const fn new(respond: F) -> Self {
        Self { respond }
    }
}

#[async_trait]
impl<F> Transport for WindowFnTransport<F>
where
    F: Fn(DateWindow) -> (Duration, Step) + Send + Sync,
{
    async fn send(&self, request: &WindowRequest) -> Result<TransportResponse, TransportError> {
        let (delay, step) = (self.respond)(request.window);
        tokio::time::sleep(delay).await;
        step.into_result()
    }
}

pub(crate) fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::default()
        .with_max_attempts(max_attempts)
        .with_delays(Duration::from_millis(1), Duration::from_millis(1))
}

pub(crate) fn selector() -> EntitySelector {
    EntitySelector::new("Odisha", "Baleshwar", "CGWB")
}

/// The `n`th single-day window starting 2023-01-01 (zero-indexed).
pub(crate) fn window(n: u64) -> DateWindow {
    let day = NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(n))
        .unwrap();
    DateWindow {
        start: day,
        end: day,
    }
}

/// Zero-based index of a window produced by [`window`].
pub(crate) fn window_index(window: DateWindow) -> u64 {
    let origin = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    (window.start - origin).num_days() as u64
}
