use crate::cli::args::FmtArgs;
use crate::cli::commands::load_manifest;
use crate::exit_codes;

pub fn run(args: FmtArgs) -> anyhow::Result<i32> {
    let manifest = match load_manifest(&args.manifest) {
        Ok(m) => m,
        Err(code) => return Ok(code),
    };

    if args.check {
        return if manifest.is_canonical() {
            eprintln!("✔ {} is canonical", args.manifest.display());
            Ok(exit_codes::OK)
        } else {
            eprintln!("✖ {} is not in canonical form", args.manifest.display());
            eprintln!("  → Run: reqlint fmt --write {}", args.manifest.display());
            Ok(exit_codes::FINDINGS)
        };
    }

    if args.write {
        if manifest.is_canonical() {
            eprintln!("✔ {} already canonical", args.manifest.display());
        } else {
            manifest.save_canonical(&args.manifest)?;
            eprintln!("Formatted {}", args.manifest.display());
        }
        return Ok(exit_codes::OK);
    }

    print!("{}", manifest.to_canonical_string());
    Ok(exit_codes::OK)
}
