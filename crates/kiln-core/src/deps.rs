//! Dependency lookup in the local store.
//!
//! kiln does not resolve version ranges itself; an external resolver (or
//! the user, by building dependencies first) decides what lands in the
//! store. This module only locates an already-cached package satisfying
//! each declared requirement.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kiln_schema::Requirement;

use crate::error::RecipeError;

/// Package folders for a recipe's resolved requirements.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDeps {
    map: BTreeMap<String, PathBuf>,
}

impl ResolvedDeps {
    /// Locate a cached package for every requirement.
    ///
    /// For each requirement the store is scanned for the highest version
    /// satisfying the range; among the binary packages of that version the
    /// lexicographically first id is chosen, which is stable across runs.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::MissingDependency`] for the first
    /// requirement with no matching cached package.
    pub fn resolve(store: &Path, requirements: &[Requirement]) -> Result<Self, RecipeError> {
        let mut map = BTreeMap::new();

        for req in requirements {
            let folder = best_match(store, req).ok_or_else(|| {
                tracing::warn!(requirement = %req, store = %store.display(), "no cached package");
                RecipeError::MissingDependency {
                    requirement: req.to_string(),
                }
            })?;
            tracing::debug!(requirement = %req, folder = %folder.display(), "dependency located");
            map.insert(req.name.clone(), folder);
        }

        Ok(Self { map })
    }

    /// Package folder for a dependency, by name.
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.map.get(name).map(PathBuf::as_path)
    }

    /// Iterate `(name, package folder)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.map.iter().map(|(n, p)| (n.as_str(), p.as_path()))
    }

    /// Whether any dependencies were resolved.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn best_match(store: &Path, req: &Requirement) -> Option<PathBuf> {
    let pkg_root = store.join(&req.name);
    let entries = std::fs::read_dir(&pkg_root).ok()?;

    let mut versions: Vec<(semver::Version, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let version = e.file_name().to_string_lossy().parse::<semver::Version>().ok()?;
            req.matches(&version).then(|| (version, e.path()))
        })
        .collect();

    versions.sort_by(|a, b| a.0.cmp(&b.0));
    let (_, version_dir) = versions.pop()?;

    // One version directory may hold several binary packages (one per
    // package id); pick deterministically.
    let mut ids: Vec<PathBuf> = std::fs::read_dir(&version_dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    ids.sort();
    ids.into_iter().next()
}
