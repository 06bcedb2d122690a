//! JSON persistence for collected pull requests.

mod error;

pub use error::OutputError;

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Writes `records` to `path` as pretty-printed JSON (2-space indent) followed
/// by a newline. Existing files are truncated.
///
/// # Errors
///
/// Returns [`OutputError`] if the file cannot be created, serialised into,
/// or flushed.
pub fn write_json_file<T: Serialize>(path: &Path, records: &[T]) -> Result<(), OutputError> {
    debug!(path = %path.display(), records = records.len(), "Writing JSON file");

    let file = File::create(path).map_err(|source| OutputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, records).map_err(|source| {
        OutputError::Serialize {
            path: path.display().to_string(),
            source,
        }
    })?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|source| OutputError::Io {
            path: path.display().to_string(),
            source,
        })?;

    info!(path = %path.display(), records = records.len(), "Wrote JSON file");
    Ok(())
}
