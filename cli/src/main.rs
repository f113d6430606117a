//! appconfigguard CLI.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use std::process::ExitCode;

use appconfigguard::{CancelHandle, GuardError, SyncError};
use cli::Cli;

/// Exit code after Ctrl-C.
const EXIT_CANCELLED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let cancel = CancelHandle::new();
    let signal = cancel.signal();
    if let Err(e) = ctrlc::set_handler(move || {
        log::warn!("Interrupted; stopping after the current store call");
        cancel.cancel();
    }) {
        log::warn!("Failed to install Ctrl-C handler: {}", e);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(commands::run(cli, signal)) {
        Ok(code) => code,
        Err(e) if is_cancelled(&e) => {
            eprintln!("Cancelled.");
            ExitCode::from(EXIT_CANCELLED)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<SyncError>()
            .is_some_and(SyncError::is_cancelled)
            || cause
                .downcast_ref::<GuardError>()
                .is_some_and(GuardError::is_cancelled)
    })
}
