//! Command-line argument definitions.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Preview, verify and synchronize a configuration store against a local JSON file.
#[derive(Parser, Debug)]
#[command(name = "appconfigguard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML). Defaults to $APPCONFIGGUARD_CONFIG, then
    /// <config dir>/appconfigguard/config.yaml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Diff a local file against the store and optionally apply the changes
    Sync(SyncArgs),

    /// Write the store contents to a local JSON file
    Download(DownloadArgs),

    /// Check a local file for invalid feature flags and secret references
    Validate(ValidateArgs),
}

/// Store connection flags shared by `sync` and `download`.
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Store endpoint: https://<name>.azconfig.io or file:<path>
    #[arg(short, long, env = "APPCONFIGGUARD_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Only read (and write new keys with) this label
    #[arg(short, long)]
    pub label: Option<String>,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Local JSON configuration file
    #[arg(short, long)]
    pub file: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Apply the changes after showing them
    #[arg(long, conflicts_with = "ci")]
    pub apply: bool,

    /// Delete remote keys that are missing from the local file
    #[arg(long)]
    pub strict: bool,

    /// Exit with code 1 when changes are pending; never applies
    #[arg(long)]
    pub ci: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Console)]
    pub output: OutputFormat,

    /// Tags for added keys, as k=v,k2=v2
    #[arg(long)]
    pub tags: Option<String>,

    /// Skip the confirmation prompt when applying
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Where to write the JSON document
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Local JSON configuration file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Console)]
    pub output: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}
