//! Isolated environment for running the sync engine end to end.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use appconfigguard::store::{
    ConfigStore, FileStore, InMemoryStore, RemoteItem, SettingWrite, StoreError,
};
use appconfigguard::{Settings, SyncEngine};

use super::builders::SettingsBuilder;

/// Temp directory holding a local document and a `file:` store.
pub struct TestHarness {
    temp_dir: TempDir,
    pub local_path: PathBuf,
    pub store_path: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let local_path = temp_dir.path().join("config.json");
        let store_path = temp_dir.path().join("store.json");
        Self {
            temp_dir,
            local_path,
            store_path,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("file:{}", self.store_path.display())
    }

    /// Default settings pointing at this harness' store.
    pub fn settings(&self) -> SettingsBuilder {
        SettingsBuilder::new(self.endpoint())
    }

    pub fn write_local(&self, json: &serde_json::Value) -> PathBuf {
        let content = serde_json::to_string_pretty(json).expect("serialize local document");
        std::fs::write(&self.local_path, content).expect("write local document");
        self.local_path.clone()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Engine over a fresh `FileStore` on this harness' store file.
    pub fn engine(&self, settings: Settings) -> SyncEngine {
        SyncEngine::new(Box::new(FileStore::new(&self.store_path)), settings)
    }
}

/// How a [`FlakyStore`] misbehaves.
#[derive(Debug, Clone, Copy)]
pub enum Flakiness {
    /// Each write/delete call fails this many times before succeeding.
    FailTimes(u32),
    /// Every write/delete call fails.
    Always,
}

/// Wraps an [`InMemoryStore`]; fetches always work, writes and deletes fail
/// according to the configured [`Flakiness`].
pub struct FlakyStore {
    inner: Arc<InMemoryStore>,
    flakiness: Flakiness,
    failures_in_a_row: AtomicU32,
    attempts: Arc<AtomicU32>,
}

impl FlakyStore {
    pub fn new(inner: Arc<InMemoryStore>, flakiness: Flakiness) -> Self {
        Self {
            inner,
            flakiness,
            failures_in_a_row: AtomicU32::new(0),
            attempts: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Shared counter of write/delete attempts, readable after the store is boxed.
    pub fn attempts(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.attempts)
    }

    fn should_fail(&self) -> bool {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failed = self.failures_in_a_row.load(Ordering::SeqCst);
        let fail = match self.flakiness {
            Flakiness::Always => true,
            Flakiness::FailTimes(n) => failed < n,
        };
        if fail {
            self.failures_in_a_row.fetch_add(1, Ordering::SeqCst);
        } else {
            self.failures_in_a_row.store(0, Ordering::SeqCst);
        }
        fail
    }
}

#[async_trait]
impl ConfigStore for FlakyStore {
    async fn fetch(&self, label_filter: Option<&str>) -> Result<Vec<RemoteItem>, StoreError> {
        self.inner.fetch(label_filter).await
    }

    async fn write(&self, setting: &SettingWrite) -> Result<(), StoreError> {
        if self.should_fail() {
            return Err(StoreError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        self.inner.write(setting).await
    }

    async fn delete(&self, key: &str, label: Option<&str>) -> Result<(), StoreError> {
        if self.should_fail() {
            return Err(StoreError::Timeout("delete timed out".to_string()));
        }
        self.inner.delete(key, label).await
    }

    fn describe(&self) -> String {
        "flaky".to_string()
    }
}
