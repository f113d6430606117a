//! Store backed by a local JSON snapshot file.
//!
//! The file holds a JSON array of settings. A missing file is an empty store.
//! Every write rewrites the whole file through a temporary sibling and a
//! rename, so readers never see a half-written snapshot.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::error::{Result, StoreError};
use super::setting::{remove, upsert, RemoteItem, SettingWrite, StoredSetting};
use super::ConfigStore;

/// Endpoint prefix selecting the file store.
pub const FILE_ENDPOINT_PREFIX: &str = "file:";

pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Builds a store from a `file:<path>` endpoint.
    pub fn from_endpoint(endpoint: &str) -> Result<Self> {
        match endpoint.strip_prefix(FILE_ENDPOINT_PREFIX) {
            Some(path) if !path.is_empty() => Ok(Self::new(path)),
            _ => Err(StoreError::InvalidEndpoint(endpoint.to_string())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<StoredSetting>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::File {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::ParseFile {
            path: self.path.clone(),
            source: e,
        })
    }

    async fn save(&self, settings: &[StoredSetting]) -> Result<()> {
        let mut content = serde_json::to_string_pretty(settings)?;
        content.push('\n');

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store.json".to_string());
        let tmp_path = self.path.with_file_name(format!(".{}.tmp", file_name));

        let io_err = |path: &Path, source: std::io::Error| StoreError::File {
            path: path.to_path_buf(),
            source,
        };
        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|e| io_err(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| io_err(&self.path, e))
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    async fn fetch(&self, label_filter: Option<&str>) -> Result<Vec<RemoteItem>> {
        let settings = self.load().await?;
        log::debug!(
            "Read {} setting(s) from {}",
            settings.len(),
            self.path.display()
        );
        Ok(settings
            .iter()
            .filter(|s| s.matches_label(label_filter))
            .map(StoredSetting::to_remote_item)
            .collect())
    }

    async fn write(&self, setting: &SettingWrite) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.load().await?;
        upsert(&mut settings, setting);
        self.save(&settings).await
    }

    async fn delete(&self, key: &str, label: Option<&str>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.load().await?;
        if remove(&mut settings, key, label) {
            self.save(&settings).await?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{}{}", FILE_ENDPOINT_PREFIX, self.path.display())
    }
}
