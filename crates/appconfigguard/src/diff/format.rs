//! Human and machine renderings of a diff report.

use std::fmt::Write;

use super::change::{Change, ChangeKind, DiffReport};
use crate::sanitize::truncate_chars;

/// Values longer than this are shortened in the console report.
pub const MAX_DISPLAY_CHARS: usize = 80;

const NO_CHANGES_MESSAGE: &str = "No changes detected. Remote configuration is up to date.";

/// Plain-text report for a terminal.
pub fn format_console(report: &DiffReport) -> String {
    if !report.has_changes() {
        return format!("{}\n", NO_CHANGES_MESSAGE);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Planned changes ({}):", report.summary.total);
    let _ = writeln!(out);

    for change in &report.changes {
        write_change(&mut out, change);
    }

    let summary = &report.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "Summary:");
    let _ = writeln!(out, "  to add:    {}", summary.added);
    let _ = writeln!(out, "  to update: {}", summary.updated);
    let _ = writeln!(out, "  to delete: {}", summary.deleted);
    let _ = writeln!(out, "  total:     {}", summary.total);
    out
}

fn write_change(out: &mut String, change: &Change) {
    let (marker, title) = match change.kind {
        ChangeKind::Add => ('+', "ADD"),
        ChangeKind::Update => ('~', "UPDATE"),
        ChangeKind::Delete => ('-', "DELETE"),
    };
    let _ = write!(out, "  {} {:<7} {}", marker, title, change.key);
    if let Some(label) = &change.label {
        let _ = write!(out, " [label: {}]", label);
    }
    let _ = writeln!(out);

    if let Some(old) = &change.old_value {
        let _ = writeln!(out, "      old: {}", display_value(old));
    }
    if let Some(new) = &change.new_value {
        let _ = writeln!(out, "      new: {}", display_value(new));
    }
}

fn display_value(value: &str) -> String {
    let length = value.chars().count();
    if length <= MAX_DISPLAY_CHARS {
        return value.to_string();
    }
    format!("{} ({} chars)", truncate_chars(value, MAX_DISPLAY_CHARS), length)
}

/// Pretty-printed JSON report: `{"changes": [...], "summary": {...}}`.
pub fn format_json(report: &DiffReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
