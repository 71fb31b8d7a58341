//! Core types for Top Hits: records, line parsing and run configuration.

pub mod config;
pub mod parse;
pub mod record;

pub use parse::{parse_line, LineRejection};
pub use record::{Record, Score};

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("invalid capacity {0}: the number of results must be a positive integer")]
    InvalidCapacity(i64),
    #[error("cannot read '{}': {reason}", .path.display())]
    FileAccess { path: PathBuf, reason: String },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert a user-supplied result count into a tracker capacity.
///
/// Zero and negative counts are rejected, as are counts that do not fit the
/// platform's `usize`.
pub fn capacity_from_arg(requested: i64) -> Result<usize, CoreError> {
    match usize::try_from(requested) {
        Ok(0) | Err(_) => Err(CoreError::InvalidCapacity(requested)),
        Ok(capacity) => Ok(capacity),
    }
}
