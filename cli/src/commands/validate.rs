use anyhow::Context;
use std::process::ExitCode;

use appconfigguard::document::{flatten_and_validate, load_document};
use appconfigguard::validator::ValidationReport;

use crate::cli::{OutputFormat, ValidateArgs};

pub fn run(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    let tree = load_document(&args.file)?;
    let (flat, issues) = flatten_and_validate(&tree)
        .with_context(|| format!("Failed to flatten {}", args.file.display()))?;
    let report = ValidationReport::new(flat.len(), issues);

    match args.output {
        OutputFormat::Console => print!("{}", report.to_console()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
