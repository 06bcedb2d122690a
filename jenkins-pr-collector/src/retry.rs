//! Bounded retry with linear backoff.
//!
//! Both the update-center download and every GraphQL search page go through
//! [`retry`]. The caller decides how a failure is treated by mapping it to a
//! [`FailureKind`]; the [`RetryPolicy`] decides how long to pause. A fired
//! [`Cancellation`] ends the loop at once, whether an attempt or a pause is in
//! progress.

mod policy;

pub use policy::{FailureKind, RetryPolicy};

use crate::rate_limit::{Cancellation, Cancelled};
use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// Runs `op` until it succeeds, the policy gives up, a failure is
/// classified as [`FailureKind::Permanent`], or `cancellation` fires.
///
/// `operation` names the call in log output.
///
/// # Errors
///
/// Returns the last error produced by `op`, or [`Cancelled`] converted into
/// `E` when the run is cancelled.
pub async fn retry<T, E, F, Fut, C>(
    policy: &RetryPolicy,
    operation: &str,
    cancellation: &Cancellation,
    mut op: F,
    classify: C,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> FailureKind,
    E: Display + From<Cancelled>,
{
    let mut attempt = 1;
    loop {
        if cancellation.is_cancelled() {
            return Err(Cancelled.into());
        }

        let result = tokio::select! {
            result = op() => result,
            () = cancellation.cancelled() => {
                warn!(operation, attempt, "Cancelled during attempt");
                return Err(Cancelled.into());
            }
        };
        let error = match result {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        let kind = classify(&error);
        let delay = policy.delay(attempt, kind);
        let exhausted = attempt >= policy.max_attempts();

        warn!(
            operation,
            attempt,
            max_attempts = policy.max_attempts(),
            ?kind,
            retry_in_secs = delay.map(|d| d.as_secs_f64()),
            error = %error,
            "Attempt failed"
        );

        let Some(delay) = delay else {
            return Err(error);
        };
        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            () = cancellation.cancelled() => {
                warn!(operation, attempt, "Cancelled during backoff");
                return Err(Cancelled.into());
            }
        }
        if exhausted {
            return Err(error);
        }
        attempt += 1;
    }
}
