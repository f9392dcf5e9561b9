use reqlint_core::validate::{validate, ValidateOptions, ValidateReport};
use reqlint_core::{severity, Diagnostic};
use serde::Serialize;
use serde_json::json;

use crate::cli::args::{CheckArgs, OutputFormat};
use crate::cli::commands::load_manifest;
use crate::exit_codes;

pub fn run(args: CheckArgs) -> anyhow::Result<i32> {
    let manifest = match load_manifest(&args.manifest) {
        Ok(m) => m,
        Err(code) => return Ok(code),
    };

    let opts = ValidateOptions {
        strict: args.strict,
    };
    let report = validate(&manifest, &opts);

    let exit_code = if report.error_count() > 0 {
        exit_codes::FINDINGS
    } else {
        exit_codes::OK
    };

    print_report(&report, &args, exit_code)?;

    Ok(exit_code)
}

fn print_report(report: &ValidateReport, args: &CheckArgs, exit_code: i32) -> anyhow::Result<()> {
    match args.format {
        OutputFormat::Json => {
            let doc = build_check_json(report, args, exit_code);
            let s = serde_json::to_string_pretty(&doc)?;

            if let Some(path) = &args.output {
                std::fs::write(path, s)
                    .map_err(|e| anyhow::anyhow!("failed to write {}: {}", path.display(), e))?;
            } else {
                println!("{}", s);
            }
        }
        OutputFormat::Text => {
            // Text format is always printed to stderr (human-readable)
            let errors = report.error_count();
            let warnings = report.warn_count();

            if errors > 0 {
                eprintln!(
                    "✖ {} failed validation ({} error{}, {} warning{})",
                    args.manifest.display(),
                    errors,
                    if errors != 1 { "s" } else { "" },
                    warnings,
                    if warnings != 1 { "s" } else { "" }
                );
            } else if warnings > 0 {
                eprintln!(
                    "⚠ {} passed with warnings ({} warning{})",
                    args.manifest.display(),
                    warnings,
                    if warnings != 1 { "s" } else { "" }
                );
            } else {
                eprintln!("✔ {} OK", args.manifest.display());
            }
            eprintln!();

            for d in sorted_diagnostics(report) {
                eprintln!("{}", d.format_terminal());
            }
        }
    }

    Ok(())
}

fn severity_rank(s: &str) -> u8 {
    match s {
        severity::ERROR => 0,
        severity::WARN => 1,
        severity::NOTE => 2,
        _ => 3,
    }
}

// Deterministic order: severity, then code, then line, then message.
fn sorted_diagnostics(report: &ValidateReport) -> Vec<&Diagnostic> {
    let mut diags: Vec<&Diagnostic> = report.diagnostics.iter().collect();
    diags.sort_by(|a, b| {
        (
            severity_rank(&a.severity),
            a.code.as_str(),
            a.line().unwrap_or(0),
            a.message.as_str(),
        )
            .cmp(&(
                severity_rank(&b.severity),
                b.code.as_str(),
                b.line().unwrap_or(0),
                b.message.as_str(),
            ))
    });
    diags
}

fn build_check_json(
    report: &ValidateReport,
    args: &CheckArgs,
    exit_code: i32,
) -> serde_json::Value {
    let diag_views: Vec<DiagView<'_>> = sorted_diagnostics(report)
        .into_iter()
        .map(DiagView::from)
        .collect();

    json!({
        "schema_version": 1,
        "ok": report.error_count() == 0,
        "exit_code": exit_code,

        "tool": {
            "name": "reqlint",
            "version": env!("CARGO_PKG_VERSION")
        },

        "command": {
            "name": "check",
            "manifest": args.manifest.display().to_string(),
            "strict": args.strict
        },

        "diagnostics": diag_views,

        "summary": {
            "diagnostic_count": report.diagnostics.len(),
            "error_count": report.error_count(),
            "warn_count": report.warn_count(),
            "note_count": report.note_count(),
            "strict": args.strict
        }
    })
}

#[derive(Serialize)]
struct DiagView<'a> {
    code: &'a str,
    severity: &'a str,
    source: &'a str,
    message: &'a str,
    context: &'a serde_json::Value,
    fix_steps: &'a Vec<String>,
}

impl<'a> From<&'a Diagnostic> for DiagView<'a> {
    fn from(d: &'a Diagnostic) -> Self {
        Self {
            code: d.code.as_str(),
            severity: d.severity.as_str(),
            source: d.source.as_str(),
            message: d.message.as_str(),
            context: &d.context,
            fix_steps: &d.fix_steps,
        }
    }
}
