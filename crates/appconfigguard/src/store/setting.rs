use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::wire::normalize_retrieved_value;

/// Tags attached to a stored setting.
pub type Tags = BTreeMap<String, String>;

/// Label filter value that selects settings without a label.
pub const NULL_LABEL_FILTER: &str = "\0";

/// A setting as read from the store, with its value already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: Tags,
}

impl RemoteItem {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            label: None,
            tags: Tags::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }
}

/// A write of one setting, value already encoded for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingWrite {
    pub key: String,
    pub value: String,
    pub content_type: String,
    pub label: Option<String>,
    pub tags: Tags,
}

/// A setting exactly as persisted, before value normalization.
///
/// This is the record layout of the file store and the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSetting {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: Tags,
}

impl StoredSetting {
    /// True if this setting is selected by the label filter.
    ///
    /// `None` selects every label; [`NULL_LABEL_FILTER`] selects unlabeled settings.
    pub fn matches_label(&self, filter: Option<&str>) -> bool {
        match filter {
            None => true,
            Some(NULL_LABEL_FILTER) => self.label.is_none(),
            Some(label) => self.label.as_deref() == Some(label),
        }
    }

    pub fn same_slot(&self, key: &str, label: Option<&str>) -> bool {
        self.key == key && self.label.as_deref() == label
    }

    pub fn to_remote_item(&self) -> RemoteItem {
        RemoteItem {
            key: self.key.clone(),
            value: normalize_retrieved_value(&self.value),
            label: self.label.clone(),
            tags: self.tags.clone(),
        }
    }
}

impl From<&SettingWrite> for StoredSetting {
    fn from(write: &SettingWrite) -> Self {
        Self {
            key: write.key.clone(),
            label: write.label.clone(),
            value: write.value.clone(),
            content_type: Some(write.content_type.clone()),
            tags: write.tags.clone(),
        }
    }
}

/// Inserts or replaces the setting occupying the same key and label.
pub(crate) fn upsert(settings: &mut Vec<StoredSetting>, write: &SettingWrite) {
    let record = StoredSetting::from(write);
    match settings
        .iter_mut()
        .find(|s| s.same_slot(&write.key, write.label.as_deref()))
    {
        Some(existing) => *existing = record,
        None => settings.push(record),
    }
}

/// Removes the setting at key and label; returns whether one was removed.
pub(crate) fn remove(settings: &mut Vec<StoredSetting>, key: &str, label: Option<&str>) -> bool {
    let before = settings.len();
    settings.retain(|s| !s.same_slot(key, label));
    settings.len() != before
}
