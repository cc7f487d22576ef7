//! Directory layout under the kiln home.
//!
//! ```text
//! ~/.kiln/
//! ├── store/<name>/<version>/<package-id>/   # installed package folders
//! ├── src/<name>/<version>/                  # extracted sources
//! ├── build/<name>/<version>/                # out-of-tree build dirs
//! ├── cache/                                 # downloaded archives by digest
//! ├── logs/                                  # build logs
//! └── config.toml
//! ```

use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Returns the kiln home directory, or None if the user's home cannot be resolved.
pub fn try_kiln_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("KILN_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".kiln"))
}

/// Returns the canonical kiln home directory (`~/.kiln`).
///
/// # Panics
///
/// Panics if neither `KILN_HOME` is set nor the user's home directory can
/// be resolved.
pub fn kiln_home() -> PathBuf {
    try_kiln_home().expect("Could not determine home directory. Set KILN_HOME to override.")
}

/// The directory layout rooted at one kiln home.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Layout rooted at an explicit directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout rooted at the canonical kiln home.
    pub fn default_home() -> Self {
        Self::new(kiln_home())
    }

    /// The home directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Installed package store.
    pub fn store(&self) -> PathBuf {
        self.root.join("store")
    }

    /// Download cache for source archives.
    pub fn cache(&self) -> PathBuf {
        self.root.join("cache")
    }

    /// Extracted source trees.
    pub fn src(&self) -> PathBuf {
        self.root.join("src")
    }

    /// Out-of-tree build directories.
    pub fn build(&self) -> PathBuf {
        self.root.join("build")
    }

    /// Build log directory.
    pub fn logs(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Config file path.
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Source folder for one recipe version.
    pub fn source_folder(&self, name: &str, version: &str) -> PathBuf {
        self.src().join(name).join(version)
    }

    /// Build folder for one recipe version.
    pub fn build_folder(&self, name: &str, version: &str) -> PathBuf {
        self.build().join(name).join(version)
    }

    /// Package folder for one binary package.
    pub fn package_folder(&self, name: &str, version: &str, package_id: &str) -> PathBuf {
        self.store().join(name).join(version).join(package_id)
    }

    /// Generate a timestamped build log path for a package.
    pub fn build_log(&self, name: &str, version: &str) -> PathBuf {
        let timestamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
        self.logs().join(format!("build-{name}-{version}-{timestamp}.log"))
    }
}
