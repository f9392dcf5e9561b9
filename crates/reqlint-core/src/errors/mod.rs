pub mod diagnostic;

pub use diagnostic::Diagnostic;

use std::path::PathBuf;

/// File-level failures. Per-line problems never surface here: they are
/// retained as manifest entries and reported as [`Diagnostic`]s.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write manifest '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ManifestError>;
