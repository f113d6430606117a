//! Applies a planned change list to a store.

use serde::Serialize;

use super::cancel::CancelSignal;
use super::error::Result;
use super::retry::RetryPolicy;
use crate::diff::{validate_changes, Change, ChangeKind};
use crate::store::{encode_for_store, ConfigStore, SettingWrite};

/// What an apply run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub written: usize,
    pub deleted: usize,
}

/// Pushes changes to a store one call at a time, in list order.
///
/// There is no transaction: when a call fails for good, the calls before it
/// stay committed and the rest are not attempted.
pub struct Reconciler<'a> {
    store: &'a dyn ConfigStore,
    policy: RetryPolicy,
    cancel: CancelSignal,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn ConfigStore, policy: RetryPolicy, cancel: CancelSignal) -> Self {
        Self {
            store,
            policy,
            cancel,
        }
    }

    pub async fn apply(&self, changes: &[Change]) -> Result<ApplyReport> {
        validate_changes(changes)?;

        let mut report = ApplyReport::default();
        for change in changes {
            match change.kind {
                ChangeKind::Add | ChangeKind::Update => {
                    let value = change.new_value.as_deref().unwrap_or_default();
                    let encoded = encode_for_store(value);
                    let write = SettingWrite {
                        key: change.key.clone(),
                        value: encoded.value,
                        content_type: encoded.content_type.to_string(),
                        label: change.label.clone(),
                        tags: change.tags.clone(),
                    };
                    let operation = format!("{} of '{}'", change.kind, change.key);
                    self.policy
                        .run(&operation, &self.cancel, || self.store.write(&write))
                        .await?;
                    log::debug!("Wrote '{}'", change.key);
                    report.written += 1;
                }
                ChangeKind::Delete => {
                    let operation = format!("delete of '{}'", change.key);
                    let label = change.label.as_deref();
                    self.policy
                        .run(&operation, &self.cancel, || self.store.delete(&change.key, label))
                        .await?;
                    log::debug!("Deleted '{}'", change.key);
                    report.deleted += 1;
                }
            }
        }

        log::info!(
            "Applied {} write(s) and {} delete(s) to {}",
            report.written,
            report.deleted,
            self.store.describe()
        );
        Ok(report)
    }
}
