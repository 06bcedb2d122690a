//! Runner error types.

/// Errors that can occur during a collection run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// No GitHub token was supplied.
    #[error("GitHub token is required. Set GITHUB_TOKEN environment variable or use --token.")]
    MissingToken,

    /// The start date is after the end date.
    #[error("Start date {start} is after end date {end}")]
    InvalidRange { start: String, end: String },

    /// GraphQL client initialization errors.
    #[error(transparent)]
    Client(#[from] crate::graphql::QueryError),

    /// Plugin registry loading errors.
    #[error("Failed to fetch plugin information: {0}")]
    Registry(#[from] crate::registry::RegistryError),

    /// Pull request search errors.
    #[error("Failed to fetch pull requests: {0}")]
    Search(#[from] crate::search::SearchError),

    /// Result file errors.
    #[error(transparent)]
    Output(#[from] crate::output::OutputError),
}

impl RunnerError {
    /// Returns true if the run stopped because it was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Registry(crate::registry::RegistryError::Cancelled(_))
                | Self::Search(crate::search::SearchError::Cancelled(_))
        )
    }
}
