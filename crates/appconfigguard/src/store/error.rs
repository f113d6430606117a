//! Store-specific error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a configuration store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid store endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("Store request failed: {0}")]
    Request(String),

    #[error("Store request timed out: {0}")]
    Timeout(String),

    #[error("Store rejected credentials (HTTP {status}): {body}")]
    Unauthorized { status: u16, body: String },

    #[error("Store is throttling requests: {0}")]
    Throttled(String),

    #[error("Store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode store response: {0}")]
    Decode(String),

    #[error("Failed to access store file '{path}': {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse store file '{path}': {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode setting: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Missing store credentials: {0}")]
    MissingCredentials(String),
}

impl StoreError {
    /// True if the failure is likely to clear up on its own.
    ///
    /// The reconciler retries every error; this only shapes log messages.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Request(_) | StoreError::Timeout(_) | StoreError::Throttled(_) => true,
            StoreError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout(err.to_string())
        } else if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Request(err.to_string())
        }
    }
}

/// Maps a non-success HTTP status and its (already sanitized) body to an error.
pub fn classify_status(status: u16, body: String) -> StoreError {
    match status {
        401 | 403 => StoreError::Unauthorized { status, body },
        429 => StoreError::Throttled(body),
        _ => StoreError::Status { status, body },
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
