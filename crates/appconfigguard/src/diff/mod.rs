//! Planning the changes between a local flat configuration and a store.

pub mod change;
pub mod engine;
pub mod error;
pub mod format;

pub use change::{Change, ChangeKind, DiffReport, DiffSummary};
pub use engine::{validate_changes, DiffEngine};
pub use error::DiffError;
pub use format::{format_console, format_json, MAX_DISPLAY_CHARS};
