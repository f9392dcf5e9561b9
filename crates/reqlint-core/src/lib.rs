//! Parsing, validation, and canonicalization for line-oriented Python
//! dependency manifests (`requirements.txt` and friends).
//!
//! The model is lossless: every physical line survives parsing as a
//! typed entry with its line number, so the same [`Manifest`] value
//! backs byte-identical re-emission, canonical formatting, structured
//! validation, fingerprinting, and diffing.

pub mod diff;
pub mod errors;
pub mod fingerprint;
pub mod model;
pub mod parse;
mod serialize;
pub mod validate;
pub mod version;

pub use errors::diagnostic::{codes, severity, Diagnostic};
pub use errors::ManifestError;
pub use model::{normalize_name, Entry, EntryKind, Manifest, Requirement};
pub use version::{Operator, Specifier, SpecifierSet, Version};
