//! Search error types.

use crate::graphql::QueryError;
use crate::rate_limit::Cancelled;
use crate::retry::FailureKind;
use thiserror::Error;

/// Errors that abort a collection run.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The run was cancelled while a page was pending.
    #[error("pull request search cancelled: {0}")]
    Cancelled(#[from] Cancelled),

    /// A GraphQL page could not be fetched.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl SearchError {
    /// Retry classification for a failed page fetch.
    #[must_use]
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Cancelled(_) => FailureKind::Permanent,
            Self::Query(error) if error.is_rate_limited() => FailureKind::Throttled,
            Self::Query(_) => FailureKind::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_failures() {
        assert_eq!(
            SearchError::from(Cancelled).failure_kind(),
            FailureKind::Permanent
        );
        assert_eq!(
            SearchError::from(QueryError::Status {
                status: 403,
                body: "You have exceeded a secondary rate limit".to_string(),
            })
            .failure_kind(),
            FailureKind::Throttled
        );
        assert_eq!(
            SearchError::from(QueryError::NoData).failure_kind(),
            FailureKind::Transient
        );
    }
}
