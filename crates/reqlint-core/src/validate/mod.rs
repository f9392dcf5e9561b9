//! Whole-manifest validation.
//!
//! Every analyzer appends structured [`Diagnostic`]s; nothing aborts on
//! the first finding, so one run reports every problem in the file.

mod analyzers;

use serde::Serialize;

use crate::errors::diagnostic::{severity, Diagnostic};
use crate::model::Manifest;

#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Promote warnings to errors.
    pub strict: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidateReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidateReport {
    pub fn error_count(&self) -> usize {
        self.count(severity::ERROR)
    }

    pub fn warn_count(&self) -> usize {
        self.count(severity::WARN)
    }

    pub fn note_count(&self) -> usize {
        self.count(severity::NOTE)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn count(&self, sev: &str) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == sev).count()
    }
}

pub fn validate(manifest: &Manifest, opts: &ValidateOptions) -> ValidateReport {
    let mut diags = Vec::new();

    analyzers::analyze_syntax(manifest, &mut diags);
    analyzers::analyze_satisfiability(manifest, &mut diags);
    analyzers::analyze_duplicates(manifest, &mut diags);
    analyzers::analyze_disabled(manifest, &mut diags);

    if opts.strict {
        for d in &mut diags {
            if d.severity == severity::WARN {
                d.severity = severity::ERROR.to_string();
            }
        }
    }

    tracing::debug!(
        diagnostics = diags.len(),
        strict = opts.strict,
        "validated manifest"
    );

    ValidateReport { diagnostics: diags }
}
