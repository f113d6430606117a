use serde::Serialize;

use crate::store::Tags;

/// What a change does to the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Add,
    Update,
    Delete,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::Update => "update",
            ChangeKind::Delete => "delete",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned modification of the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

impl Change {
    pub fn add(key: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Add,
            key: key.into(),
            old_value: None,
            new_value: Some(new_value.into()),
            label: None,
            tags: Tags::new(),
        }
    }

    pub fn update(
        key: impl Into<String>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            kind: ChangeKind::Update,
            key: key.into(),
            old_value: Some(old_value.into()),
            new_value: Some(new_value.into()),
            label: None,
            tags: Tags::new(),
        }
    }

    pub fn delete(key: impl Into<String>, old_value: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Delete,
            key: key.into(),
            old_value: Some(old_value.into()),
            new_value: None,
            label: None,
            tags: Tags::new(),
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }
}

/// Counts of planned changes by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
    pub total: usize,
}

impl DiffSummary {
    pub fn from_changes(changes: &[Change]) -> Self {
        let mut summary = Self::default();
        for change in changes {
            match change.kind {
                ChangeKind::Add => summary.added += 1,
                ChangeKind::Update => summary.updated += 1,
                ChangeKind::Delete => summary.deleted += 1,
            }
        }
        summary.total = changes.len();
        summary
    }
}

/// Ordered changes plus their summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    pub changes: Vec<Change>,
    pub summary: DiffSummary,
}

impl DiffReport {
    pub fn new(changes: Vec<Change>) -> Self {
        let summary = DiffSummary::from_changes(&changes);
        Self { changes, summary }
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}
