//! Retry policy with exponential backoff and full jitter.

use std::time::Duration;

/// How many times to try a window and how long to wait in between.
///
/// The delay after zero-indexed attempt `n` is
/// `base_delay * factor^n + U(0, 1) * jitter`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per window, including the first one.
    pub max_attempts: u32,
    /// Delay unit multiplied by `factor^attempt`.
    pub base_delay: Duration,
    /// Exponential growth factor.
    pub factor: f64,
    /// Upper bound of the uniform random component.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            factor: 2.0,
            jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Sets the total number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Scales both the exponential and the jitter component.
    #[must_use]
    pub const fn with_delays(mut self, base_delay: Duration, jitter: Duration) -> Self {
        self.base_delay = base_delay;
        self.jitter = jitter;
        self
    }

    /// Number of attempts actually made, never less than one.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Returns the sleep before the attempt following `attempt`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.delay_with_sample(attempt, rand::random::<f64>())
    }

    /// Backoff for a given jitter sample in `[0, 1)`.
    ///
    /// A negative or non-finite `factor` is treated as 1. Results too large
    /// for a [`Duration`] saturate.
    fn delay_with_sample(&self, attempt: u32, sample: f64) -> Duration {
        let exponent = i32::try_from(attempt.min(16)).unwrap_or(16);
        let growth = if self.factor.is_finite() && self.factor >= 0.0 {
            self.factor.powi(exponent)
        } else {
            1.0
        };
        let sample = if sample.is_nan() { 0.0 } else { sample.clamp(0.0, 1.0) };
        scale(self.base_delay, growth).saturating_add(scale(self.jitter, sample))
    }
}

/// `duration * by` for a non-negative `by`, saturating at [`Duration::MAX`].
fn scale(duration: Duration, by: f64) -> Duration {
    let secs = duration.as_secs_f64() * by;
    if secs.is_nan() {
        // zero times infinity
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
