//! Manifest data model.
//!
//! A [`Manifest`] retains every physical line of the source file as a
//! typed [`Entry`] with its 1-based line number, raw text, and the
//! section label in effect. Nothing is discarded during parsing, so
//! lossless re-emission and whole-file validation both work from the
//! same value.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::{ManifestError, Result};
use crate::version::SpecifierSet;

/// Case-insensitive package-name normalization: lowercase, runs of
/// `.`/`_`/`-` collapse to a single `-`.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            pending_sep = true;
        } else {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

/// One dependency declaration: `name[extras]specifiers ; marker  # comment`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirement {
    pub name: String,
    /// Extras as written, in source order.
    pub extras: Vec<String>,
    pub specifiers: SpecifierSet,
    /// Opaque environment marker, stored verbatim and never evaluated.
    pub marker: Option<String>,
    /// Trailing same-line comment, without the leading `#`.
    pub comment: Option<String>,
}

impl Requirement {
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Canonical declaration text: normalized name, sorted normalized
    /// extras, specifiers without interior whitespace, marker appended
    /// after ` ; `. The trailing comment is not part of the canonical
    /// form.
    pub fn canonical(&self) -> String {
        let mut s = self.normalized_name();
        if !self.extras.is_empty() {
            let mut extras: Vec<String> =
                self.extras.iter().map(|e| normalize_name(e)).collect();
            extras.sort();
            extras.dedup();
            s.push('[');
            s.push_str(&extras.join(","));
            s.push(']');
        }
        if !self.specifiers.is_empty() {
            s.push_str(&self.specifiers.to_string());
        }
        if let Some(marker) = &self.marker {
            s.push_str(" ; ");
            s.push_str(marker);
        }
        s
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    Blank,
    /// Banner or prose comment. Never a disabled declaration.
    Comment { text: String },
    /// A commented-out declaration that parses cleanly if uncommented.
    Disabled { requirement: Requirement },
    Declaration { requirement: Requirement },
    /// A non-blank, non-comment line that failed to parse. Retained so
    /// validation can report every problem with its line number.
    Invalid { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// 1-based line number in the source file.
    pub line_no: usize,
    /// Raw line text, without the line terminator.
    pub raw: String,
    /// Documentation-only section label from the nearest banner above.
    pub section: Option<String>,
    pub kind: EntryKind,
}

impl Entry {
    /// The requirement for an active declaration entry.
    pub fn requirement(&self) -> Option<&Requirement> {
        match &self.kind {
            EntryKind::Declaration { requirement } => Some(requirement),
            _ => None,
        }
    }

    /// The requirement for a disabled (commented-out) declaration.
    pub fn disabled_requirement(&self) -> Option<&Requirement> {
        match &self.kind {
            EntryKind::Disabled { requirement } => Some(requirement),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub entries: Vec<Entry>,
    pub source_path: Option<PathBuf>,
    pub(crate) trailing_newline: bool,
}

impl Manifest {
    /// Parse manifest text. Infallible: malformed lines become
    /// [`EntryKind::Invalid`] entries.
    pub fn parse_str(text: &str) -> Self {
        let (entries, trailing_newline) = crate::parse::parse_source(text);
        tracing::debug!(
            entries = entries.len(),
            declarations = entries.iter().filter(|e| e.requirement().is_some()).count(),
            "parsed manifest"
        );
        Manifest {
            entries,
            source_path: None,
            trailing_newline,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest = Self::parse_str(&text);
        manifest.source_path = Some(path.to_path_buf());
        Ok(manifest)
    }

    /// Active declarations in source order.
    pub fn declarations(&self) -> impl Iterator<Item = (&Entry, &Requirement)> {
        self.entries.iter().filter_map(|e| match &e.kind {
            EntryKind::Declaration { requirement } => Some((e, requirement)),
            _ => None,
        })
    }

    /// Disabled (commented-out) declarations in source order.
    pub fn disabled(&self) -> impl Iterator<Item = (&Entry, &Requirement)> {
        self.entries.iter().filter_map(|e| match &e.kind {
            EntryKind::Disabled { requirement } => Some((e, requirement)),
            _ => None,
        })
    }

    /// Active declarations grouped by normalized name.
    pub fn active_by_name(
        &self,
    ) -> std::collections::BTreeMap<String, Vec<(&Entry, &Requirement)>> {
        let mut map: std::collections::BTreeMap<String, Vec<(&Entry, &Requirement)>> =
            std::collections::BTreeMap::new();
        for (entry, req) in self.declarations() {
            map.entry(req.normalized_name()).or_default().push((entry, req));
        }
        map
    }
}
