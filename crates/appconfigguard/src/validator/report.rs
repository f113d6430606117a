use serde::Serialize;
use std::fmt::Write;

use super::error::ValidationIssue;

/// Outcome of validating a whole configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub entries: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(entries: usize, issues: Vec<ValidationIssue>) -> Self {
        Self {
            valid: issues.is_empty(),
            entries,
            issues,
        }
    }

    /// Plain-text rendering, one line per issue.
    pub fn to_console(&self) -> String {
        if self.valid {
            return format!("Configuration is valid ({} entries checked).\n", self.entries);
        }
        let mut out = format!(
            "Found {} validation issue(s) in {} entries:\n",
            self.issues.len(),
            self.entries
        );
        for issue in &self.issues {
            let _ = writeln!(out, "  {}", issue);
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
