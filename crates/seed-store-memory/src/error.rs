//! Error types for dumping stored rows.

use thiserror::Error;

/// Errors that can occur while writing stored rows.
#[derive(Error, Debug)]
pub enum DumpError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
