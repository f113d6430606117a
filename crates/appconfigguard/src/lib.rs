pub mod config;
pub mod diff;
pub mod document;
pub mod error;
pub mod sanitize;
pub mod secrets;
pub mod store;
pub mod sync;
pub mod validator;

pub use config::{load_settings, validate_settings, Settings, SettingsOverrides};
pub use diff::{Change, ChangeKind, DiffEngine, DiffReport, DiffSummary};
pub use document::{flatten, unflatten, ConfigTree, FlatConfig};
pub use error::{GuardError, Result};
pub use secrets::{resolve_secret, resolve_store_token, SecretError};
pub use store::{open_store, ConfigStore, RemoteItem};
pub use sync::{ApplyReport, CancelHandle, CancelSignal, SyncEngine, SyncError, SyncPlan};
pub use validator::{classify, validate_configuration, ClassifiedValue, ValidationIssue};
