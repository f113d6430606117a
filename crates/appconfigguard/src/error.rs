use thiserror::Error;

use crate::config::ConfigError;
use crate::diff::DiffError;
use crate::document::DocumentError;
use crate::secrets::SecretError;
use crate::store::StoreError;
use crate::sync::SyncError;
use crate::validator::ClassificationError;

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("Settings error: {0}")]
    Config(#[from] ConfigError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Validation error: {0}")]
    Classification(#[from] ClassificationError),

    #[error("Diff error: {0}")]
    Diff(#[from] DiffError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Credentials error: {0}")]
    Secret(#[from] SecretError),
}

impl GuardError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GuardError::Sync(e) if e.is_cancelled())
    }
}

pub type Result<T> = std::result::Result<T, GuardError>;
