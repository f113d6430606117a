//! Document-specific error types.

use std::path::PathBuf;
use thiserror::Error;

/// Structural errors raised while loading, flattening or unflattening a
/// configuration document. These are always fatal for the current operation.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read configuration file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write configuration file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize JSON: {0}")]
    SerializeJson(#[from] serde_json::Error),

    #[error("Cannot render value at '{path}': {reason}")]
    Unrenderable { path: String, reason: String },

    #[error("Type conflict at '{path}': expected {expected}, found {found}")]
    TypeConflict {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("List index {index} at '{path}' exceeds the maximum of {max}")]
    IndexOutOfRange {
        path: String,
        index: usize,
        max: usize,
    },
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
