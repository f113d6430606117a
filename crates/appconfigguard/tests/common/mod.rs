//! Shared test utilities for appconfigguard integration tests.
//!
//! - `TestHarness` for isolated runs against a `file:` store in a temp dir
//! - builders for settings and remote items
//! - `FlakyStore`, a store wrapper that fails on demand

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{FlakyStore, TestHarness};
