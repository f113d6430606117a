use std::collections::HashMap;

use super::change::{Change, ChangeKind, DiffReport};
use super::error::{DiffError, Result};
use crate::document::FlatConfig;
use crate::store::{canonical_value, RemoteItem, Tags};

/// Compares a local flat configuration against the remote store contents.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    strict: bool,
    label: Option<String>,
    tags: Tags,
}

impl DiffEngine {
    /// With `strict`, remote keys missing locally are planned for deletion.
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }

    /// Label given to added keys.
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Tags given to added keys.
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Plans the changes that make the remote store match `local`.
    ///
    /// Values are compared in canonical form, so a secret reference stored
    /// as `{"uri":...}` equals the same reference written as a marker. The
    /// result is sorted by key.
    pub fn compare(&self, local: &FlatConfig, remote: &[RemoteItem]) -> DiffReport {
        let mut remote_by_key: HashMap<&str, &RemoteItem> = HashMap::with_capacity(remote.len());
        for item in remote {
            if remote_by_key.insert(item.key.as_str(), item).is_some() {
                log::debug!("Remote key '{}' appears more than once; using the last one", item.key);
            }
        }

        let mut changes = Vec::new();
        for (key, local_value) in local {
            match remote_by_key.remove(key.as_str()) {
                Some(item) => {
                    if canonical_value(local_value) != canonical_value(&item.value) {
                        changes.push(
                            Change::update(key, item.value.as_str(), local_value.as_str())
                                .with_label(item.label.clone())
                                .with_tags(item.tags.clone()),
                        );
                    }
                }
                None => {
                    changes.push(
                        Change::add(key, local_value.as_str())
                            .with_label(self.label.clone())
                            .with_tags(self.tags.clone()),
                    );
                }
            }
        }

        if self.strict {
            for item in remote_by_key.into_values() {
                changes.push(
                    Change::delete(item.key.as_str(), item.value.as_str())
                        .with_label(item.label.clone())
                        .with_tags(item.tags.clone()),
                );
            }
        } else if !remote_by_key.is_empty() {
            log::debug!(
                "{} remote-only key(s) kept (strict mode off)",
                remote_by_key.len()
            );
        }

        changes.sort_by(|a, b| a.key.cmp(&b.key));
        DiffReport::new(changes)
    }
}

/// Rejects change lists that would produce a malformed store call.
pub fn validate_changes(changes: &[Change]) -> Result<()> {
    for (index, change) in changes.iter().enumerate() {
        if change.key.is_empty() {
            return Err(DiffError::EmptyKey { index });
        }
        if change.kind != ChangeKind::Delete && change.new_value.is_none() {
            return Err(DiffError::MissingValue {
                kind: change.kind,
                key: change.key.clone(),
            });
        }
    }
    Ok(())
}
