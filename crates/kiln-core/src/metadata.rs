//! Package metadata persisted alongside installed artifacts.
//!
//! Every package folder carries a `kiln-meta.toml` recording what was
//! built and the [`CppInfo`] consumers read back.

use std::path::Path;

use serde::{Deserialize, Serialize};

use kiln_schema::CppInfo;

/// Filename of the metadata record inside a package folder.
pub const META_FILENAME: &str = "kiln-meta.toml";

/// Errors raised while reading or writing package metadata.
#[derive(thiserror::Error, Debug)]
pub enum MetaError {
    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The metadata file is not valid TOML for the schema.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serialization failure (should not happen for well-formed metadata).
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The on-disk metadata record for one binary package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMeta {
    /// Recipe name.
    pub name: String,
    /// Recipe version.
    pub version: String,
    /// Binary package id digest.
    pub id: String,
    /// Consumer-facing metadata.
    pub cpp_info: CppInfo,
}

impl PackageMeta {
    /// Write the record into `package_folder/kiln-meta.toml`.
    pub fn save(&self, package_folder: &Path) -> Result<(), MetaError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(package_folder.join(META_FILENAME), content)?;
        Ok(())
    }

    /// Read the record back from a package folder.
    pub fn load(package_folder: &Path) -> Result<Self, MetaError> {
        let content = std::fs::read_to_string(package_folder.join(META_FILENAME))?;
        Ok(toml::from_str(&content)?)
    }
}
