use similar::TextDiff;

use reqlint_core::diff::diff;

use crate::cli::args::{DiffArgs, OutputFormat};
use crate::cli::commands::load_manifest;
use crate::exit_codes;

pub fn run(args: DiffArgs) -> anyhow::Result<i32> {
    let old = match load_manifest(&args.old) {
        Ok(m) => m,
        Err(code) => return Ok(code),
    };
    let new = match load_manifest(&args.new) {
        Ok(m) => m,
        Err(code) => return Ok(code),
    };

    let report = diff(&old, &new);
    let exit_code = if report.is_empty() {
        exit_codes::OK
    } else {
        exit_codes::FINDINGS
    };

    match args.format {
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "schema_version": 1,
                "ok": report.is_empty(),
                "exit_code": exit_code,
                "old": args.old.display().to_string(),
                "new": args.new.display().to_string(),
                "added": report.added,
                "removed": report.removed,
                "changed": report.changed,
                "summary": {
                    "change_count": report.change_count(),
                    "added_count": report.added.len(),
                    "removed_count": report.removed.len(),
                    "changed_count": report.changed.len(),
                }
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Text => {
            if report.is_empty() {
                eprintln!("✔ No differences in the active requirement set");
            } else {
                let old_canonical = old.to_canonical_string();
                let new_canonical = new.to_canonical_string();
                let text_diff = TextDiff::from_lines(&old_canonical, &new_canonical);
                print!(
                    "{}",
                    text_diff.unified_diff().context_radius(2).header(
                        &args.old.display().to_string(),
                        &args.new.display().to_string()
                    )
                );
                eprintln!(
                    "{} added, {} removed, {} changed",
                    report.added.len(),
                    report.removed.len(),
                    report.changed.len()
                );
            }
        }
    }

    Ok(exit_code)
}
