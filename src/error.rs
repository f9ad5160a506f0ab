//! Error types for coverage checking.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent a coverage check from being attempted at all.
///
/// Missing fields are never reported through this type; they end up in a
/// [`MatchReport`](crate::MatchReport).
#[derive(Debug, Error)]
pub enum MatchError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Input errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a JSON object at the document root, got {actual}")]
    RootNotObject { actual: String },

    // Schema errors (exit code 2)
    #[error("root schema '{type_name}' is not an object-like type")]
    InvalidRootSchema { type_name: String },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
}

impl MatchError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            MatchError::FileNotFound { .. } | MatchError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            MatchError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}
