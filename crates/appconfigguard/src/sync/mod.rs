//! Pushing a planned diff to a store, with retries and cancellation.

pub mod cancel;
pub mod engine;
pub mod error;
pub mod reconciler;
pub mod retry;

pub use cancel::{CancelHandle, CancelSignal};
pub use engine::{Download, SyncEngine, SyncPlan};
pub use error::SyncError;
pub use reconciler::{ApplyReport, Reconciler};
pub use retry::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES};
