//! # Backend Errors

use std::path::PathBuf;

use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Raw storage errors
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Store file not found: {0}")]
    MissingFile(PathBuf),

    #[error("Malformed store file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
