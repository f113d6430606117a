use thiserror::Error;

use super::change::ChangeKind;

/// A change list that must not reach the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("Change #{index} has an empty key")]
    EmptyKey { index: usize },

    #[error("{kind} of '{key}' has no new value")]
    MissingValue { kind: ChangeKind, key: String },
}

pub type Result<T> = std::result::Result<T, DiffError>;
