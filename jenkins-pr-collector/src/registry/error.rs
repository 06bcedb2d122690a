//! Registry loading error types.

use crate::rate_limit::Cancelled;
use thiserror::Error;

/// Errors that can occur while loading the plugin registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Network or client failure.
    #[error("failed to fetch update center data: {0}")]
    Request(#[from] reqwest::Error),

    /// The update center answered with a non-200 status.
    #[error("failed to fetch update center data: HTTP {status}")]
    Status { status: u16 },

    /// The body holds no `{ ... }` span.
    #[error("invalid update center JSON format")]
    Format,

    /// The JSON span is not a valid update-center document.
    #[error("failed to parse update center data: {0}")]
    Parse(#[from] serde_json::Error),

    /// The run was cancelled before the download completed.
    #[error("update center download cancelled: {0}")]
    Cancelled(#[from] Cancelled),
}
