use crate::version::SpecifierError;

/// Per-line parse failures. The file loop converts these into
/// [`crate::model::EntryKind::Invalid`] entries; they never abort a
/// whole-file parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid package name in '{0}'")]
    InvalidName(String),
    #[error("unterminated extras list in '{0}'")]
    UnterminatedExtras(String),
    #[error("empty extras list in '{0}'")]
    EmptyExtras(String),
    #[error("invalid extra name '{0}'")]
    InvalidExtra(String),
    #[error("empty environment marker in '{0}'")]
    EmptyMarker(String),
    #[error(transparent)]
    Specifier(#[from] SpecifierError),
}
