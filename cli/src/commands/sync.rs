use anyhow::Context;
use std::io::{BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use appconfigguard::diff::{format_console, format_json};
use appconfigguard::{CancelSignal, SyncEngine};

use super::{resolve_settings, warn_issues};
use crate::cli::{OutputFormat, SyncArgs};

pub async fn run(args: SyncArgs, config: Option<&Path>, cancel: CancelSignal) -> anyhow::Result<ExitCode> {
    let settings = resolve_settings(config, &args.store, args.tags.as_deref(), args.strict)?;
    let engine = SyncEngine::connect(settings)?.with_cancel(cancel);

    let plan = engine
        .plan(&args.file)
        .await
        .with_context(|| format!("Failed to plan sync of {}", args.file.display()))?;
    warn_issues(&plan.issues);

    match args.output {
        OutputFormat::Console => print!("{}", format_console(&plan.report)),
        OutputFormat::Json => println!("{}", format_json(&plan.report)?),
    }

    if args.ci {
        return Ok(if plan.has_changes() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    if !args.apply || !plan.has_changes() {
        return Ok(ExitCode::SUCCESS);
    }

    if !args.yes && !confirm(plan.report.summary.total, &engine.store().describe())? {
        eprintln!("Aborted; no changes applied.");
        return Ok(ExitCode::SUCCESS);
    }

    let report = engine.apply(plan.changes()).await.context("Failed to apply changes")?;
    eprintln!(
        "Applied {} write(s) and {} delete(s).",
        report.written, report.deleted
    );
    Ok(ExitCode::SUCCESS)
}

/// Asks on stderr and reads one line from stdin. Only `y` or `Y` confirms.
fn confirm(total: usize, store: &str) -> anyhow::Result<bool> {
    eprint!("Apply {} change(s) to {}? [y/N]: ", total, store);
    std::io::stderr().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y"))
}
