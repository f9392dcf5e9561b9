use super::errors::ParseError;
use crate::model::Requirement;
use crate::version::SpecifierSet;

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

pub(crate) fn is_valid_name(s: &str) -> bool {
    let bytes = s.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && s.chars().all(is_name_char)
        }
        _ => false,
    }
}

/// Parse one declaration: `name[extras]specifiers ; marker  # comment`.
///
/// `text` must already be known non-blank and non-comment.
pub(crate) fn parse_requirement(text: &str) -> Result<Requirement, ParseError> {
    // Trailing comment first. Declarations contain no '#' of their own.
    let (decl, comment) = match text.split_once('#') {
        Some((decl, tail)) => (decl, Some(tail.trim().to_string())),
        None => (text, None),
    };
    let decl = decl.trim();

    // Package name.
    let name_end = decl.find(|c: char| !is_name_char(c)).unwrap_or(decl.len());
    let name = &decl[..name_end];
    if !is_valid_name(name) {
        return Err(ParseError::InvalidName(decl.to_string()));
    }
    let mut rest = decl[name_end..].trim_start();

    // Optional extras.
    let mut extras = Vec::new();
    if let Some(tail) = rest.strip_prefix('[') {
        let Some(close) = tail.find(']') else {
            return Err(ParseError::UnterminatedExtras(decl.to_string()));
        };
        let inner = &tail[..close];
        if inner.trim().is_empty() {
            return Err(ParseError::EmptyExtras(decl.to_string()));
        }
        for extra in inner.split(',') {
            let extra = extra.trim();
            if !is_valid_name(extra) {
                return Err(ParseError::InvalidExtra(extra.to_string()));
            }
            extras.push(extra.to_string());
        }
        rest = tail[close + 1..].trim_start();
    }

    // Optional opaque environment marker after ';'.
    let (spec_text, marker) = match rest.split_once(';') {
        Some((spec, marker)) => {
            let marker = marker.trim();
            if marker.is_empty() {
                return Err(ParseError::EmptyMarker(decl.to_string()));
            }
            (spec.trim(), Some(marker.to_string()))
        }
        None => (rest.trim(), None),
    };

    let specifiers = SpecifierSet::parse(spec_text)?;

    Ok(Requirement {
        name: name.to_string(),
        extras,
        specifiers,
        marker,
        comment,
    })
}
