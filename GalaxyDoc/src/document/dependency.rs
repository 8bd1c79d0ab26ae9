//! Dependency identifiers

use std::collections::HashSet;

use crate::bundle::{BundleReference, FILE_SCHEME};
use crate::utils::path::normalize_components;

/// A dependency as written into the records
///
/// SC2 dependency strings look like
/// `bnet:Liberty (Mod)/0.0/999,file:Mods/Liberty.SC2Mod` or just
/// `file:Mods/MyMod.SC2Mod`. The `file:` component identifies the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef {
    /// Identifier exactly as emitted
    pub id: String,
    /// Identity used for deduplication
    pub key: String,
}

impl DependencyRef {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let key = dependency_key(&id);
        Self { id, key }
    }
}

impl From<&BundleReference> for DependencyRef {
    fn from(bundle: &BundleReference) -> Self {
        Self::new(bundle.dependency_id())
    }
}

/// The `file:` component with its path normalized, or the whole identifier
/// when there is none
fn dependency_key(id: &str) -> String {
    id.split(',')
        .map(str::trim)
        .find_map(|part| part.strip_prefix(FILE_SCHEME))
        .map_or_else(
            || id.trim().to_string(),
            |path| format!("{FILE_SCHEME}{}", normalize_components(path)),
        )
}

/// Drop later dependencies whose key was already seen, keeping order
#[must_use]
pub fn dedup_dependencies(dependencies: Vec<DependencyRef>) -> Vec<DependencyRef> {
    let mut seen = HashSet::new();
    dependencies
        .into_iter()
        .filter(|dep| {
            let first = seen.insert(dep.key.clone());
            if !first {
                tracing::debug!("Dropping duplicate dependency {}", dep.id);
            }
            first
        })
        .collect()
}
