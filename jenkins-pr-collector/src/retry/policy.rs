//! Retry policy and failure classification.

use std::time::Duration;

/// Default number of attempts for every retried call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// How a failed attempt should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The remote side asked us to slow down.
    Throttled,
    /// Network, HTTP or payload failure worth another attempt.
    Transient,
    /// Retrying cannot help (e.g. the run was cancelled).
    Permanent,
}

/// Attempt cap and linear backoff steps.
///
/// The pause after attempt `n` (1-based) is `n * step`, where the step depends
/// on the [`FailureKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    transient_step: Duration,
    throttled_step: Duration,
    pause_after_final: bool,
}

impl RetryPolicy {
    /// Policy for GraphQL search pages: 5 attempts, 2s steps for transient
    /// failures, 5s steps for rate-limit failures. A transient failure on the
    /// final attempt is returned without pausing.
    #[must_use]
    pub const fn search() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            transient_step: Duration::from_secs(2),
            throttled_step: Duration::from_secs(5),
            pause_after_final: false,
        }
    }

    /// Policy for the update-center download: 5 attempts, 2s steps, pausing
    /// after every failed attempt including the last.
    #[must_use]
    pub const fn registry() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            transient_step: Duration::from_secs(2),
            throttled_step: Duration::from_secs(2),
            pause_after_final: true,
        }
    }

    /// Overrides the backoff steps, keeping the attempt cap.
    #[must_use]
    pub const fn with_steps(mut self, transient_step: Duration, throttled_step: Duration) -> Self {
        self.transient_step = transient_step;
        self.throttled_step = throttled_step;
        self
    }

    /// Overrides the attempt cap. Values below one are treated as one.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Maximum number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pause before the next attempt after `attempt` failed with `kind`.
    ///
    /// `None` means the failure must be returned immediately.
    #[must_use]
    pub fn delay(&self, attempt: u32, kind: FailureKind) -> Option<Duration> {
        match kind {
            FailureKind::Permanent => None,
            FailureKind::Throttled => Some(self.throttled_step * attempt),
            FailureKind::Transient
                if attempt >= self.max_attempts && !self.pause_after_final =>
            {
                None
            }
            FailureKind::Transient => Some(self.transient_step * attempt),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::search()
    }
}
