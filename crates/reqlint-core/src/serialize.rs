//! Lossless and canonical re-emission.

use std::path::Path;

use crate::errors::{ManifestError, Result};
use crate::model::{EntryKind, Manifest};

impl Manifest {
    /// Byte-identical reconstruction of the source text.
    pub fn to_source(&self) -> String {
        let mut out = self
            .entries
            .iter()
            .map(|e| e.raw.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }

    /// Canonical form: declarations are rewritten (normalized name,
    /// sorted extras, whitespace-free specifiers), structure — banners,
    /// blank lines, disabled declarations, entry order — is preserved.
    /// Lines that failed to parse are kept verbatim.
    pub fn to_canonical_string(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match &entry.kind {
                EntryKind::Blank => {}
                EntryKind::Comment { .. } | EntryKind::Invalid { .. } => {
                    out.push_str(entry.raw.trim_end());
                }
                EntryKind::Disabled { requirement } => {
                    out.push_str("# ");
                    out.push_str(&requirement.canonical());
                }
                EntryKind::Declaration { requirement } => {
                    out.push_str(&requirement.canonical());
                    if let Some(comment) = &requirement.comment {
                        if !comment.is_empty() {
                            out.push_str("  # ");
                            out.push_str(comment);
                        }
                    }
                }
            }
            out.push('\n');
        }
        out
    }

    /// Whether the source already is in canonical form.
    pub fn is_canonical(&self) -> bool {
        self.to_source() == self.to_canonical_string()
    }

    pub fn save_canonical(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_canonical_string()).map_err(|source| {
            ManifestError::Write {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::model::Manifest;

    #[test]
    fn to_source_is_lossless() {
        for text in [
            "",
            "fastapi>=0.104.0",
            "# Core\nfastapi >= 0.104.0\n\npydantic>=2.9,<2.10\n",
            "fastapi>=0.104.0\nbroken line ???\n",
        ] {
            assert_eq!(Manifest::parse_str(text).to_source(), text);
        }
    }

    #[test]
    fn canonical_normalizes_declarations() {
        let manifest = Manifest::parse_str(
            "Uvicorn[watchfiles, standard] >= 0.24.0\nPython_DateUtil>=2.8\n",
        );
        assert_eq!(
            manifest.to_canonical_string(),
            "uvicorn[standard,watchfiles]>=0.24.0\npython-dateutil>=2.8\n"
        );
    }

    #[test]
    fn canonical_preserves_structure() {
        let manifest = Manifest::parse_str(
            "# Database\naiosqlite>=0.19.0\n\n#  asyncpg >= 0.29.0\n",
        );
        assert_eq!(
            manifest.to_canonical_string(),
            "# Database\naiosqlite>=0.19.0\n\n# asyncpg>=0.29.0\n"
        );
    }

    #[test]
    fn canonical_keeps_trailing_comments() {
        let manifest = Manifest::parse_str("pytest >= 7.4   # test runner\n");
        assert_eq!(
            manifest.to_canonical_string(),
            "pytest>=7.4  # test runner\n"
        );
    }

    #[test]
    fn canonical_round_trip_is_equivalent() {
        let source = "# Core\nFastAPI >= 0.104.0\nuvicorn[standard]>=0.24.0\n";
        let first = Manifest::parse_str(source);
        let reparsed = Manifest::parse_str(&first.to_canonical_string());
        let pairs = |m: &Manifest| {
            m.declarations()
                .map(|(_, r)| (r.normalized_name(), r.specifiers.to_string()))
                .collect::<Vec<_>>()
        };
        assert_eq!(pairs(&first), pairs(&reparsed));
        assert!(reparsed.is_canonical());
    }

    #[test]
    fn is_canonical_detects_drift() {
        assert!(Manifest::parse_str("fastapi>=0.104.0\n").is_canonical());
        assert!(!Manifest::parse_str("fastapi >= 0.104.0\n").is_canonical());
    }
}
