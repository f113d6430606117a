//! Subcommand implementations.

mod download;
mod sync;
mod validate;

use anyhow::Context;
use std::path::Path;
use std::process::ExitCode;

use appconfigguard::config::{load_settings, parse_tags, validate_settings};
use appconfigguard::validator::ValidationIssue;
use appconfigguard::{CancelSignal, Settings, SettingsOverrides};

use crate::cli::{Cli, Commands, StoreArgs};

pub async fn run(cli: Cli, cancel: CancelSignal) -> anyhow::Result<ExitCode> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Sync(args) => sync::run(args, config, cancel).await,
        Commands::Download(args) => download::run(args, config, cancel).await,
        Commands::Validate(args) => validate::run(args),
    }
}

/// Loads the settings file, applies command-line overrides and validates.
fn resolve_settings(
    config: Option<&Path>,
    store: &StoreArgs,
    tags: Option<&str>,
    strict: bool,
) -> anyhow::Result<Settings> {
    let mut settings = load_settings(config).context("Failed to load settings")?;

    let tags = tags
        .map(parse_tags)
        .transpose()
        .context("Invalid --tags")?;
    settings.merge_overrides(SettingsOverrides {
        endpoint: store.endpoint.clone(),
        label: store.label.clone(),
        tags,
        strict,
    });

    validate_settings(&settings)?;
    Ok(settings)
}

/// Prints classification problems to stderr.
fn warn_issues(issues: &[ValidationIssue]) {
    if issues.is_empty() {
        return;
    }
    eprintln!("Warning: {} validation issue(s) found:", issues.len());
    for issue in issues {
        eprintln!("  {}", issue);
    }
}
