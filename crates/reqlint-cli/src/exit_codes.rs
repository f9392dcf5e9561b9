//! Unified exit codes for the reqlint CLI.
//! These codes are part of the public contract and must stay stable
//! across subcommands.

pub const OK: i32 = 0;
pub const FINDINGS: i32 = 1; // Lint errors, non-canonical formatting, or manifest differences
pub const USAGE_ERROR: i32 = 2; // Bad invocation or unreadable manifest
