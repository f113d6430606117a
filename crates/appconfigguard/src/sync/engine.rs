//! Plan, apply and download against one store.

use std::path::Path;
use tracing::Instrument;

use super::cancel::CancelSignal;
use super::error::{Result, SyncError};
use super::reconciler::{ApplyReport, Reconciler};
use super::retry::RetryPolicy;
use crate::config::Settings;
use crate::diff::{Change, DiffEngine, DiffReport};
use crate::document::{flatten_and_validate, load_document, unflatten, write_document, ConfigTree, FlatConfig};
use crate::secrets::resolve_store_token;
use crate::store::{open_store, ConfigStore, RemoteItem};
use crate::validator::{validate_configuration, ValidationIssue};

/// Result of comparing a local document with the store.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub local: FlatConfig,
    /// Classification problems found in the local document. Not fatal.
    pub issues: Vec<ValidationIssue>,
    pub report: DiffReport,
}

impl SyncPlan {
    pub fn changes(&self) -> &[Change] {
        &self.report.changes
    }

    pub fn has_changes(&self) -> bool {
        self.report.has_changes()
    }
}

/// Store contents rebuilt into a document.
#[derive(Debug, Clone)]
pub struct Download {
    pub tree: ConfigTree,
    pub flat: FlatConfig,
    pub issues: Vec<ValidationIssue>,
}

pub struct SyncEngine {
    store: Box<dyn ConfigStore>,
    settings: Settings,
    cancel: CancelSignal,
}

impl SyncEngine {
    pub fn new(store: Box<dyn ConfigStore>, settings: Settings) -> Self {
        Self {
            store,
            settings,
            cancel: CancelSignal::never(),
        }
    }

    /// Opens the store named by `settings.endpoint`, resolving the token
    /// from `settings.credentials`.
    pub fn connect(settings: Settings) -> crate::Result<Self> {
        let token = resolve_store_token(&settings.credentials)?;
        let store = open_store(&settings.endpoint, token)?;
        Ok(Self::new(store, settings))
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &dyn ConfigStore {
        self.store.as_ref()
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.settings.retry.policy()
    }

    fn diff_engine(&self) -> DiffEngine {
        DiffEngine::new(self.settings.strict)
            .with_label(self.settings.label.clone())
            .with_tags(self.settings.tags.clone())
    }

    async fn fetch_remote(&self) -> Result<Vec<RemoteItem>> {
        let label = self.settings.label.as_deref();
        self.retry_policy()
            .run("fetch", &self.cancel, || self.store.fetch(label))
            .await
    }

    /// Loads, flattens and classifies a document, then diffs it against the store.
    pub async fn plan(&self, path: &Path) -> Result<SyncPlan> {
        let tree = load_document(path)?;
        self.plan_tree(&tree).await
    }

    pub async fn plan_tree(&self, tree: &ConfigTree) -> Result<SyncPlan> {
        let span = tracing::info_span!("sync.plan", store = %self.store.describe());
        async move {
            let (local, issues) = flatten_and_validate(tree)?;
            if !issues.is_empty() {
                log::warn!("{} local value(s) failed validation", issues.len());
            }

            let remote = self.fetch_remote().await?;
            let report = self.diff_engine().compare(&local, &remote);
            log::info!(
                "Planned {} change(s): {} add, {} update, {} delete",
                report.summary.total,
                report.summary.added,
                report.summary.updated,
                report.summary.deleted
            );

            Ok(SyncPlan {
                local,
                issues,
                report,
            })
        }
        .instrument(span)
        .await
    }

    /// Pushes planned changes to the store.
    pub async fn apply(&self, changes: &[Change]) -> Result<ApplyReport> {
        let span = tracing::info_span!("sync.apply", changes = changes.len());
        Reconciler::new(self.store.as_ref(), self.retry_policy(), self.cancel.clone())
            .apply(changes)
            .instrument(span)
            .await
    }

    /// Fetches every setting under the configured label and rebuilds a document.
    pub async fn download(&self) -> Result<Download> {
        let span = tracing::info_span!("sync.download", store = %self.store.describe());
        async move {
            let items = self.fetch_remote().await?;
            if items.is_empty() {
                return Err(SyncError::EmptyStore(self.store.describe()));
            }

            let mut flat = FlatConfig::new();
            for item in items {
                if let Some(previous) = flat.insert(item.key.clone(), item.value) {
                    log::debug!(
                        "Key '{}' appears more than once; replacing '{}'",
                        item.key,
                        crate::sanitize::truncate_chars(&previous, 40)
                    );
                }
            }

            let issues = validate_configuration(&flat);
            let tree = unflatten(&flat)?;
            log::info!("Downloaded {} setting(s)", flat.len());
            Ok(Download { tree, flat, issues })
        }
        .instrument(span)
        .await
    }

    /// Downloads and writes the document as indented JSON.
    pub async fn download_to(&self, path: &Path) -> Result<Download> {
        let download = self.download().await?;
        write_document(path, &download.tree)?;
        Ok(download)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;
    use crate::store::InMemoryStore;
    use crate::sync::cancel::CancelHandle;

    fn settings(strict: bool) -> Settings {
        let mut settings = Settings {
            endpoint: "file:unused.json".into(),
            strict,
            ..Settings::default()
        };
        settings.retry.base_delay_ms = 1;
        settings
    }

    #[tokio::test]
    async fn test_plan_then_apply_is_idempotent() {
        let engine = SyncEngine::new(Box::new(InMemoryStore::new()), settings(true));
        let tree = parse_document(
            r#"{
                "app": {"name": "demo", "port": 8080},
                "feature": {"beta": true},
                "secrets": {"db": "@Microsoft.KeyVault(SecretUri=https://kv.vault.azure.net/secrets/db)"}
            }"#,
        )
        .unwrap();

        let plan = engine.plan_tree(&tree).await.unwrap();
        assert_eq!(plan.report.summary.added, 4);
        assert!(plan.issues.is_empty());

        let applied = engine.apply(plan.changes()).await.unwrap();
        assert_eq!(applied.written, 4);

        let again = engine.plan_tree(&tree).await.unwrap();
        assert!(!again.has_changes(), "{:?}", again.report.changes);
    }

    #[tokio::test]
    async fn test_plan_reports_issues_without_failing() {
        let engine = SyncEngine::new(Box::new(InMemoryStore::new()), settings(false));
        let tree = parse_document(r#"{"feature": {"beta": "sometimes"}}"#).unwrap();

        let plan = engine.plan_tree(&tree).await.unwrap();
        assert_eq!(plan.issues.len(), 1);
        assert_eq!(plan.report.summary.added, 1);
    }

    #[tokio::test]
    async fn test_fetch_uses_configured_label() {
        let store = InMemoryStore::with_items([
            RemoteItem::new("a", "1").with_label("prod"),
            RemoteItem::new("a", "2").with_label("dev"),
        ]);
        let mut s = settings(false);
        s.label = Some("prod".into());
        let engine = SyncEngine::new(Box::new(store), s);

        let download = engine.download().await.unwrap();
        assert_eq!(download.flat.get("a").map(String::as_str), Some("1"));
    }

    #[tokio::test]
    async fn test_download_empty_store_is_error() {
        let engine = SyncEngine::new(Box::new(InMemoryStore::new()), settings(false));
        let err = engine.download().await.unwrap_err();
        assert!(matches!(err, SyncError::EmptyStore(_)));
    }

    #[tokio::test]
    async fn test_download_rebuilds_tree() {
        let store = InMemoryStore::with_items([
            RemoteItem::new("db.host", "localhost"),
            RemoteItem::new("db.port", "5432"),
            RemoteItem::new("hosts.0", "a"),
            RemoteItem::new("hosts.1", "b"),
        ]);
        let engine = SyncEngine::new(Box::new(store), settings(false));
        let download = engine.download().await.unwrap();

        assert_eq!(
            download.tree.to_json(),
            serde_json::json!({
                "db": {"host": "localhost", "port": "5432"},
                "hosts": ["a", "b"]
            })
        );
    }

    #[tokio::test]
    async fn test_cancelled_engine_does_not_touch_store() {
        let handle = CancelHandle::new();
        handle.cancel();
        let engine =
            SyncEngine::new(Box::new(InMemoryStore::new()), settings(false)).with_cancel(handle.signal());

        let err = engine.plan_tree(&ConfigTree::object()).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_fetch_is_retried() {
        let store = InMemoryStore::new();
        store.fail_next_calls(1).await;
        let engine = SyncEngine::new(Box::new(store), settings(false));

        engine.plan_tree(&ConfigTree::object()).await.unwrap();
    }

    #[test]
    fn test_connect_file_endpoint_needs_no_token() {
        let engine = SyncEngine::connect(settings(false)).unwrap();
        assert_eq!(engine.store().describe(), "file:unused.json");
    }
}
