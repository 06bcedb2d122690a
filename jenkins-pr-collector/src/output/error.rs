//! Output error types.

use thiserror::Error;

/// Errors that can occur while writing result files.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Creating or writing the file failed.
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialising the records failed.
    #[error("Failed to serialise records for '{path}': {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
