use anyhow::Context;
use std::path::Path;
use std::process::ExitCode;

use appconfigguard::{CancelSignal, SyncEngine};

use super::{resolve_settings, warn_issues};
use crate::cli::DownloadArgs;

pub async fn run(args: DownloadArgs, config: Option<&Path>, cancel: CancelSignal) -> anyhow::Result<ExitCode> {
    let settings = resolve_settings(config, &args.store, None, false)?;
    let engine = SyncEngine::connect(settings)?.with_cancel(cancel);

    let download = engine
        .download_to(&args.output)
        .await
        .with_context(|| format!("Failed to download to {}", args.output.display()))?;
    warn_issues(&download.issues);

    println!(
        "Downloaded {} setting(s) to {}",
        download.flat.len(),
        args.output.display()
    );
    Ok(ExitCode::SUCCESS)
}
