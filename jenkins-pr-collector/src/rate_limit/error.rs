//! Cancellation error type.

use thiserror::Error;

/// The run was cancelled before the operation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;
