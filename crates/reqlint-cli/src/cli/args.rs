use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "reqlint",
    version,
    about = "Lint, canonicalize, fingerprint, and diff requirements manifests"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a manifest and report structured diagnostics
    Check(CheckArgs),
    /// Rewrite a manifest into canonical form
    Fmt(FmtArgs),
    /// List declarations with their sections
    List(ListArgs),
    /// Compare the active requirement sets of two manifests
    Diff(DiffArgs),
    /// Print the fingerprint of the active requirement set
    Fingerprint(FingerprintArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Manifest file to validate
    #[arg(default_value = "requirements.txt")]
    pub manifest: PathBuf,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the JSON report to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct FmtArgs {
    /// Manifest file to format
    #[arg(default_value = "requirements.txt")]
    pub manifest: PathBuf,

    /// Rewrite the file in place instead of printing to stdout
    #[arg(long, conflicts_with = "check")]
    pub write: bool,

    /// Exit non-zero when the file is not already canonical
    #[arg(long)]
    pub check: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// Manifest file to list
    #[arg(default_value = "requirements.txt")]
    pub manifest: PathBuf,

    /// Include disabled (commented-out) declarations
    #[arg(long)]
    pub all: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DiffArgs {
    /// Old manifest
    pub old: PathBuf,

    /// New manifest
    pub new: PathBuf,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct FingerprintArgs {
    /// Manifest file to fingerprint
    #[arg(default_value = "requirements.txt")]
    pub manifest: PathBuf,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}
