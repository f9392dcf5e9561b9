pub mod check;
pub mod diff;
pub mod fingerprint;
pub mod fmt;
pub mod list;

use std::path::Path;

use reqlint_core::Manifest;

use crate::cli::args::{Cli, Command};
use crate::exit_codes;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Check(args) => check::run(args),
        Command::Fmt(args) => fmt::run(args),
        Command::List(args) => list::run(args),
        Command::Diff(args) => diff::run(args),
        Command::Fingerprint(args) => fingerprint::run(args),
    }
}

/// Load a manifest or report the failure and yield the exit code.
pub(crate) fn load_manifest(path: &Path) -> Result<Manifest, i32> {
    tracing::debug!(path = %path.display(), "loading manifest");
    match Manifest::load(path) {
        Ok(manifest) => Ok(manifest),
        Err(e) => {
            eprintln!("error: {e}");
            Err(exit_codes::USAGE_ERROR)
        }
    }
}
