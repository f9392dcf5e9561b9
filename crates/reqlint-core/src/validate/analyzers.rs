use serde_json::json;

use crate::errors::diagnostic::{codes, severity, Diagnostic};
use crate::model::{EntryKind, Manifest};
use crate::parse;

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Every non-blank, non-comment line must parse into a
/// (name, extras, specifiers) triple.
pub(crate) fn analyze_syntax(manifest: &Manifest, diags: &mut Vec<Diagnostic>) {
    for entry in &manifest.entries {
        if let EntryKind::Invalid { error } = &entry.kind {
            diags.push(
                Diagnostic::new(
                    codes::E_SYNTAX,
                    format!("line {} does not parse: {}", entry.line_no, error),
                )
                .with_source("parse")
                .with_context(json!({
                    "line": entry.line_no,
                    "content": truncate(&entry.raw, 50),
                }))
                .with_fix_step("Correct the declaration or comment the line out"),
            );
        }
    }
}

/// A single declaration whose specifier set admits no version at all.
pub(crate) fn analyze_satisfiability(manifest: &Manifest, diags: &mut Vec<Diagnostic>) {
    for (entry, req) in manifest.declarations() {
        if req.specifiers.is_provably_empty() {
            diags.push(
                Diagnostic::new(
                    codes::E_UNSATISFIABLE,
                    format!(
                        "no version of '{}' can satisfy '{}'",
                        req.name, req.specifiers
                    ),
                )
                .with_source("satisfiability")
                .with_context(json!({
                    "line": entry.line_no,
                    "package": req.normalized_name(),
                    "specifiers": req.specifiers.to_string(),
                }))
                .with_fix_step("Relax or remove one of the conflicting clauses"),
            );
        }
    }
}

/// Duplicate active declarations: conflicting constraint sets are an
/// error, mutually compatible ones a warning.
pub(crate) fn analyze_duplicates(manifest: &Manifest, diags: &mut Vec<Diagnostic>) {
    for (name, decls) in manifest.active_by_name() {
        if decls.len() < 2 {
            continue;
        }
        let lines: Vec<usize> = decls.iter().map(|(e, _)| e.line_no).collect();
        let constraints: Vec<String> =
            decls.iter().map(|(_, r)| r.specifiers.to_string()).collect();
        let (first_entry, _) = decls[0];

        let conflicting = decls.iter().enumerate().any(|(i, (_, a))| {
            decls[i + 1..]
                .iter()
                .any(|(_, b)| a.specifiers.conflicts_with(&b.specifiers))
        });

        if conflicting {
            diags.push(
                Diagnostic::new(
                    codes::E_DUP_CONFLICT,
                    format!("'{}' is declared more than once with conflicting constraints", name),
                )
                .with_source("duplicates")
                .with_context(json!({
                    "line": first_entry.line_no,
                    "package": name,
                    "lines": lines,
                    "constraints": constraints,
                }))
                .with_fix_step("Keep a single declaration for the package")
                .with_fix_step("Merge the version constraints into one satisfiable set"),
            );
        } else {
            diags.push(
                Diagnostic::new(
                    codes::W_DUP_REDUNDANT,
                    format!("'{}' is declared more than once", name),
                )
                .with_severity(severity::WARN)
                .with_source("duplicates")
                .with_context(json!({
                    "line": first_entry.line_no,
                    "package": name,
                    "lines": lines,
                    "constraints": constraints,
                }))
                .with_fix_step("Keep a single declaration for the package"),
            );
        }
    }
}

/// Commented-out alternatives must stay syntactically valid, and a
/// disabled declaration shadowed by an active one is called out.
pub(crate) fn analyze_disabled(manifest: &Manifest, diags: &mut Vec<Diagnostic>) {
    let active = manifest.active_by_name();

    for entry in &manifest.entries {
        if let EntryKind::Comment { text } = &entry.kind {
            if !parse::looks_like_declaration(text) {
                continue;
            }
            if let Err(e) = parse::parse_requirement(text) {
                diags.push(
                    Diagnostic::new(
                        codes::W_DISABLED_INVALID,
                        format!(
                            "commented-out declaration on line {} would not parse if uncommented: {}",
                            entry.line_no, e
                        ),
                    )
                    .with_severity(severity::WARN)
                    .with_source("disabled")
                    .with_context(json!({
                        "line": entry.line_no,
                        "content": truncate(text, 50),
                    }))
                    .with_fix_step("Fix the commented declaration so uncommenting it works"),
                );
            }
        }
    }

    for (entry, req) in manifest.disabled() {
        let name = req.normalized_name();
        if active.contains_key(&name) {
            diags.push(
                Diagnostic::new(
                    codes::N_DISABLED_SHADOWED,
                    format!(
                        "disabled declaration of '{}' on line {} is shadowed by an active one",
                        name, entry.line_no
                    ),
                )
                .with_severity(severity::NOTE)
                .with_source("disabled")
                .with_context(json!({
                    "line": entry.line_no,
                    "package": name,
                    "active_lines": active[&name]
                        .iter()
                        .map(|(e, _)| e.line_no)
                        .collect::<Vec<_>>(),
                })),
            );
        }
    }
}
