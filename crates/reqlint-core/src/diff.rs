//! Set-diff of two manifests by active requirement.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Manifest;

#[derive(Debug, Clone, Serialize)]
pub struct DiffEntry {
    pub name: String,
    /// Canonical declaration text in the old manifest, if present.
    pub old: Option<String>,
    /// Canonical declaration text in the new manifest, if present.
    pub new: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiffReport {
    pub added: Vec<DiffEntry>,
    pub removed: Vec<DiffEntry>,
    pub changed: Vec<DiffEntry>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }
}

fn canonical_by_name(manifest: &Manifest) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (_, req) in manifest.declarations() {
        map.entry(req.normalized_name())
            .or_default()
            .push(req.canonical());
    }
    map.into_iter()
        .map(|(name, mut decls)| {
            decls.sort();
            (name, decls.join(", "))
        })
        .collect()
}

pub fn diff(old: &Manifest, new: &Manifest) -> DiffReport {
    let old_decls = canonical_by_name(old);
    let new_decls = canonical_by_name(new);
    let mut report = DiffReport::default();

    for (name, old_text) in &old_decls {
        match new_decls.get(name) {
            None => report.removed.push(DiffEntry {
                name: name.clone(),
                old: Some(old_text.clone()),
                new: None,
            }),
            Some(new_text) if new_text != old_text => report.changed.push(DiffEntry {
                name: name.clone(),
                old: Some(old_text.clone()),
                new: Some(new_text.clone()),
            }),
            Some(_) => {}
        }
    }

    for (name, new_text) in &new_decls {
        if !old_decls.contains_key(name) {
            report.added.push(DiffEntry {
                name: name.clone(),
                old: None,
                new: Some(new_text.clone()),
            });
        }
    }

    report
}
