use serde::Serialize;

/// Stable diagnostic codes. Part of the public report contract.
pub mod codes {
    /// A non-blank, non-comment line failed to parse.
    pub const E_SYNTAX: &str = "E_SYNTAX";
    /// The same package is declared more than once with incompatible
    /// specifier sets.
    pub const E_DUP_CONFLICT: &str = "E_DUP_CONFLICT";
    /// A single declaration's specifier set admits no version.
    pub const E_UNSATISFIABLE: &str = "E_UNSATISFIABLE";
    /// Duplicate declarations that are mutually compatible.
    pub const W_DUP_REDUNDANT: &str = "W_DUP_REDUNDANT";
    /// A commented-out declaration that would not parse if uncommented.
    pub const W_DISABLED_INVALID: &str = "W_DISABLED_INVALID";
    /// A commented-out declaration whose package is also active.
    pub const N_DISABLED_SHADOWED: &str = "N_DISABLED_SHADOWED";
}

pub mod severity {
    pub const ERROR: &str = "error";
    pub const WARN: &str = "warn";
    pub const NOTE: &str = "note";
}

/// A structured finding with a stable code, JSON context, and
/// actionable fix steps.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: String,
    pub source: String,
    pub message: String,
    pub context: serde_json::Value,
    pub fix_steps: Vec<String>,
}

impl Diagnostic {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity: severity::ERROR.to_string(),
            source: String::new(),
            message: message.into(),
            context: serde_json::json!({}),
            fix_steps: Vec::new(),
        }
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = severity.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    pub fn with_fix_step(mut self, step: impl Into<String>) -> Self {
        self.fix_steps.push(step.into());
        self
    }

    /// 1-based line number from the context, when present.
    pub fn line(&self) -> Option<u64> {
        self.context.get("line").and_then(|v| v.as_u64())
    }

    pub fn format_terminal(&self) -> String {
        let mut s = String::new();
        match self.line() {
            Some(line) => s.push_str(&format!(
                "{}: [{}] line {}: {}\n",
                self.severity, self.code, line, self.message
            )),
            None => s.push_str(&format!("{}: [{}] {}\n", self.severity, self.code, self.message)),
        }
        for step in &self.fix_steps {
            s.push_str(&format!("  → {}\n", step));
        }
        s
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_fields() {
        let d = Diagnostic::new(codes::E_SYNTAX, "bad line")
            .with_severity(severity::WARN)
            .with_source("parse")
            .with_context(serde_json::json!({ "line": 3 }))
            .with_fix_step("fix the line");
        assert_eq!(d.code, "E_SYNTAX");
        assert_eq!(d.severity, "warn");
        assert_eq!(d.line(), Some(3));
        assert_eq!(d.fix_steps.len(), 1);
    }

    #[test]
    fn terminal_format_includes_line_and_fix_steps() {
        let d = Diagnostic::new(codes::E_DUP_CONFLICT, "conflict")
            .with_context(serde_json::json!({ "line": 7 }))
            .with_fix_step("remove one declaration");
        let text = d.format_terminal();
        assert!(text.contains("line 7"));
        assert!(text.contains("→ remove one declaration"));
    }
}
