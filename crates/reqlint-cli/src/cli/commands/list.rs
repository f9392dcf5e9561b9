use serde_json::json;

use reqlint_core::Requirement;

use crate::cli::args::{ListArgs, OutputFormat};
use crate::cli::commands::load_manifest;
use crate::exit_codes;

pub fn run(args: ListArgs) -> anyhow::Result<i32> {
    let manifest = match load_manifest(&args.manifest) {
        Ok(m) => m,
        Err(code) => return Ok(code),
    };

    let mut rows: Vec<Row<'_>> = manifest
        .declarations()
        .map(|(entry, req)| Row {
            line: entry.line_no,
            section: entry.section.as_deref(),
            req,
            enabled: true,
        })
        .collect();
    if args.all {
        rows.extend(manifest.disabled().map(|(entry, req)| Row {
            line: entry.line_no,
            section: entry.section.as_deref(),
            req,
            enabled: false,
        }));
        rows.sort_by_key(|r| r.line);
    }

    match args.format {
        OutputFormat::Json => {
            let items: Vec<serde_json::Value> = rows.iter().map(Row::to_json).collect();
            let doc = json!({
                "schema_version": 1,
                "manifest": args.manifest.display().to_string(),
                "declarations": items,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Text => {
            for row in &rows {
                println!("{}", row.to_line());
            }
        }
    }

    Ok(exit_codes::OK)
}

struct Row<'a> {
    line: usize,
    section: Option<&'a str>,
    req: &'a Requirement,
    enabled: bool,
}

impl Row<'_> {
    fn display_name(&self) -> String {
        let mut s = String::new();
        if !self.enabled {
            s.push_str("# ");
        }
        s.push_str(&self.req.name);
        if !self.req.extras.is_empty() {
            s.push('[');
            s.push_str(&self.req.extras.join(","));
            s.push(']');
        }
        s
    }

    fn to_line(&self) -> String {
        let mut s = format!(
            "{:>4}  {:<32} {:<24}",
            self.line,
            self.display_name(),
            self.req.specifiers.to_string()
        );
        if let Some(section) = self.section {
            s.push_str(&format!("  {}", section));
        }
        s.trim_end().to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        json!({
            "line": self.line,
            "name": self.req.name,
            "normalized_name": self.req.normalized_name(),
            "extras": self.req.extras,
            "specifiers": self.req.specifiers.to_string(),
            "marker": self.req.marker,
            "section": self.section,
            "enabled": self.enabled,
        })
    }
}
