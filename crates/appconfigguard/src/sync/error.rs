//! Sync-specific error types.

use thiserror::Error;

use crate::diff::DiffError;
use crate::document::DocumentError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Cancelled during {operation}")]
    Cancelled { operation: String },

    #[error("{operation} failed after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Refusing to apply changes: {0}")]
    InvalidChanges(#[from] DiffError),

    #[error("No configuration items found in {0}")]
    EmptyStore(String),
}

impl SyncError {
    /// True if the sync stopped because it was told to, not because it gave up.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SyncError::Cancelled { .. })
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
