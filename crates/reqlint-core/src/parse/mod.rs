//! Line-oriented manifest parsing.
//!
//! The file loop classifies every physical line and never aborts:
//! malformed declarations are retained as [`EntryKind::Invalid`]
//! entries so validation can report all of them at once.

mod errors;
mod line;

pub use errors::ParseError;

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::{Entry, EntryKind};

lazy_static! {
    // A comment "looks like" a declaration when a package name is
    // immediately followed by extras or a comparison operator.
    static ref LOOKS_LIKE_DECLARATION: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*\s*(\[|===|==|!=|>=|<=|~=|>|<)").unwrap();
}

pub(crate) fn looks_like_declaration(text: &str) -> bool {
    LOOKS_LIKE_DECLARATION.is_match(text)
}

pub(crate) use line::parse_requirement;

/// Section label from a banner comment body: decoration characters are
/// stripped, and an empty result means the comment is not a banner.
pub(crate) fn banner_label(body: &str) -> Option<String> {
    let label = body
        .trim_matches(|c: char| matches!(c, '=' | '-' | '~' | '*' | '#') || c.is_whitespace());
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

/// Split manifest text into entries. Returns the entries and whether
/// the source ended with a newline (needed for lossless re-emission).
pub(crate) fn parse_source(text: &str) -> (Vec<Entry>, bool) {
    if text.is_empty() {
        return (Vec::new(), false);
    }

    let mut lines: Vec<&str> = text.split('\n').collect();
    let trailing_newline = lines.last() == Some(&"");
    if trailing_newline {
        lines.pop();
    }

    let mut entries = Vec::with_capacity(lines.len());
    let mut section: Option<String> = None;

    for (idx, raw) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let logical = raw.trim_end_matches('\r');
        let trimmed = logical.trim();

        let kind = if trimmed.is_empty() {
            EntryKind::Blank
        } else if let Some(stripped) = trimmed.strip_prefix('#') {
            let body = stripped.trim_start_matches('#').trim();
            if looks_like_declaration(body) {
                match parse_requirement(body) {
                    Ok(requirement) => EntryKind::Disabled { requirement },
                    // Kept as a plain comment; validation flags it.
                    Err(_) => EntryKind::Comment {
                        text: body.to_string(),
                    },
                }
            } else {
                if let Some(label) = banner_label(body) {
                    section = Some(label);
                }
                EntryKind::Comment {
                    text: body.to_string(),
                }
            }
        } else {
            match parse_requirement(trimmed) {
                Ok(requirement) => EntryKind::Declaration { requirement },
                Err(e) => {
                    tracing::debug!(line = line_no, error = %e, "invalid manifest line");
                    EntryKind::Invalid {
                        error: e.to_string(),
                    }
                }
            }
        };

        entries.push(Entry {
            line_no,
            raw: (*raw).to_string(),
            section: section.clone(),
            kind,
        });
    }

    (entries, trailing_newline)
}
