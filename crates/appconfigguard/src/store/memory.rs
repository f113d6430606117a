//! In-process store, used by tests and dry runs.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::error::{Result, StoreError};
use super::setting::{remove, upsert, RemoteItem, SettingWrite, StoredSetting};
use super::ConfigStore;

/// A call received by an [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Fetch { label: Option<String> },
    Write { key: String, label: Option<String> },
    Delete { key: String, label: Option<String> },
}

#[derive(Default)]
struct State {
    settings: Vec<StoredSetting>,
    calls: Vec<StoreCall>,
    pending_failures: u32,
}

/// A store that keeps settings in memory and records every call.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given items, stored as plain text.
    pub fn with_items(items: impl IntoIterator<Item = RemoteItem>) -> Self {
        let settings = items
            .into_iter()
            .map(|item| StoredSetting {
                key: item.key,
                label: item.label,
                value: item.value,
                content_type: None,
                tags: item.tags,
            })
            .collect();
        Self {
            state: Mutex::new(State {
                settings,
                ..State::default()
            }),
        }
    }

    /// Makes the next `count` calls fail with a transient error.
    pub async fn fail_next_calls(&self, count: u32) {
        self.state.lock().await.pending_failures = count;
    }

    /// Every call received so far, in order.
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().await.calls.clone()
    }

    /// Raw persisted settings, values not normalized.
    pub async fn stored(&self) -> Vec<StoredSetting> {
        self.state.lock().await.settings.clone()
    }

    fn take_failure(state: &mut State) -> Result<()> {
        if state.pending_failures > 0 {
            state.pending_failures -= 1;
            return Err(StoreError::Request("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for InMemoryStore {
    async fn fetch(&self, label_filter: Option<&str>) -> Result<Vec<RemoteItem>> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::Fetch {
            label: label_filter.map(str::to_string),
        });
        Self::take_failure(&mut state)?;

        Ok(state
            .settings
            .iter()
            .filter(|s| s.matches_label(label_filter))
            .map(StoredSetting::to_remote_item)
            .collect())
    }

    async fn write(&self, setting: &SettingWrite) -> Result<()> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::Write {
            key: setting.key.clone(),
            label: setting.label.clone(),
        });
        Self::take_failure(&mut state)?;

        upsert(&mut state.settings, setting);
        Ok(())
    }

    async fn delete(&self, key: &str, label: Option<&str>) -> Result<()> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::Delete {
            key: key.to_string(),
            label: label.map(str::to_string),
        });
        Self::take_failure(&mut state)?;

        remove(&mut state.settings, key, label);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
