//! GraphQL executor error types.

use thiserror::Error;

/// Errors produced by a single GraphQL round trip.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Transport or client construction failure.
    #[error("GitHub API error: {0}")]
    Transport(#[from] octocrab::Error),

    /// The round trip exceeded the per-request timeout.
    #[error("GraphQL request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Non-200 HTTP status.
    #[error("HTTP error: {status}, Body: {body}")]
    Status { status: u16, body: String },

    /// The body is not a GraphQL response envelope.
    #[error("failed to parse GraphQL response: {source}, Body: {body}")]
    Envelope {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// The server reported errors; only the first is kept.
    #[error("GraphQL error: {message}")]
    Api { message: String },

    /// Neither errors nor data were returned.
    #[error("no data in GraphQL response")]
    NoData,

    /// `data` did not match the expected shape.
    #[error("failed to parse GraphQL data: {source}, Data: {data}")]
    Decode {
        #[source]
        source: serde_json::Error,
        data: String,
    },
}

impl QueryError {
    /// Whether the failure message mentions a rate limit.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.to_string().contains("rate limit")
    }
}
