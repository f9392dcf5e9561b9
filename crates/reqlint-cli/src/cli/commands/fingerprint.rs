use reqlint_core::fingerprint;

use crate::cli::args::{FingerprintArgs, OutputFormat};
use crate::cli::commands::load_manifest;
use crate::exit_codes;

pub fn run(args: FingerprintArgs) -> anyhow::Result<i32> {
    let manifest = match load_manifest(&args.manifest) {
        Ok(m) => m,
        Err(code) => return Ok(code),
    };

    let fp = fingerprint::compute(&manifest);

    match args.format {
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "schema_version": 1,
                "manifest": args.manifest.display().to_string(),
                "fingerprint": fp.hex,
                "components": fp.components,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Text => {
            println!("{}", fp.hex);
        }
    }

    Ok(exit_codes::OK)
}
