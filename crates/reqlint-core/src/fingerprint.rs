use sha2::{Digest, Sha256};

use crate::model::Manifest;

#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub hex: String,
    pub components: Vec<String>,
}

pub fn sha256_hex(s: &str) -> String {
    let mut h = Sha256::new();
    h.update(s.as_bytes());
    hex::encode(h.finalize())
}

/// Deterministic fingerprint of the active requirement set.
///
/// Declarations are canonicalized and sorted before hashing, so
/// comments, blank lines, declaration order, and disabled alternatives
/// never change the result. The tool version is not an input; the hash
/// identifies the requirement set alone.
pub fn compute(manifest: &Manifest) -> Fingerprint {
    let mut components: Vec<String> = manifest
        .declarations()
        .map(|(_, req)| req.canonical())
        .collect();
    components.sort();

    let raw = components.join("\n");
    Fingerprint {
        hex: sha256_hex(&raw),
        components,
    }
}
