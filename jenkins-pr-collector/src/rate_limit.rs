//! Request throttling for the GitHub GraphQL API.
//!
//! GraphQL search calls are admitted through a token bucket so that a run
//! never exceeds the configured request rate. Waiting for admission is
//! cancellable through [`Cancellation`], the same signal that interrupts
//! retries and their backoff.

mod cancel;
mod error;

pub use cancel::{CancelHandle, Cancellation};
pub use error::Cancelled;

use governor::{DefaultDirectRateLimiter, Quota};
use std::num::NonZeroU32;
use tracing::{debug, warn};

/// Default request rate for GraphQL search calls.
pub const DEFAULT_REQUESTS_PER_SECOND: NonZeroU32 = NonZeroU32::MIN;

/// Token bucket admitting at most `n` requests per second with a burst of one.
pub struct RequestThrottle {
    limiter: DefaultDirectRateLimiter,
    per_second: NonZeroU32,
}

impl RequestThrottle {
    /// Creates a throttle admitting `per_second` requests per second.
    #[must_use]
    pub fn per_second(per_second: NonZeroU32) -> Self {
        let quota = Quota::per_second(per_second).allow_burst(NonZeroU32::MIN);
        Self {
            limiter: DefaultDirectRateLimiter::direct(quota),
            per_second,
        }
    }

    /// Waits until the bucket admits one request.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if `cancellation` fires before
    /// the request is admitted.
    pub async fn acquire(&self, cancellation: &Cancellation) -> Result<(), Cancelled> {
        if cancellation.is_cancelled() {
            return Err(Cancelled);
        }

        tokio::select! {
            () = self.limiter.until_ready() => {
                debug!("Request admitted by throttle");
                Ok(())
            }
            () = cancellation.cancelled() => {
                warn!("Cancelled while waiting for the request throttle");
                Err(Cancelled)
            }
        }
    }
}

impl std::fmt::Debug for RequestThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestThrottle")
            .field("per_second", &self.per_second)
            .finish_non_exhaustive()
    }
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::per_second(DEFAULT_REQUESTS_PER_SECOND)
    }
}
