//! Consumer-facing package metadata.
//!
//! `CppInfo` is what a downstream build reads back from an installed
//! package: which libraries to link, where headers and libraries live
//! relative to the package folder, and which preprocessor defines the
//! package's headers expect.

use serde::{Deserialize, Serialize};

/// Metadata exported by a packaged library to its consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppInfo {
    /// Link names of the produced libraries (`wxcode_gtk2u_pdfdoc-3.2`).
    /// Empty for header-only packages.
    #[serde(default)]
    pub libs: Vec<String>,
    /// Include directories, relative to the package folder.
    pub includedirs: Vec<String>,
    /// Library directories, relative to the package folder.
    pub libdirs: Vec<String>,
    /// Directories exposing build-system files (e.g. `lib/pkgconfig`).
    #[serde(default)]
    pub builddirs: Vec<String>,
    /// Preprocessor defines consumers must set.
    #[serde(default)]
    pub defines: Vec<String>,
    /// Name under which a `pkg-config` file is exported, if any.
    #[serde(default)]
    pub pkg_config_name: Option<String>,
}

impl Default for CppInfo {
    fn default() -> Self {
        Self {
            libs: Vec::new(),
            includedirs: vec!["include".to_string()],
            libdirs: vec!["lib".to_string()],
            builddirs: Vec::new(),
            defines: Vec::new(),
            pkg_config_name: None,
        }
    }
}

impl CppInfo {
    /// Metadata for a header-only package: no libraries, no libdirs.
    pub fn header_only() -> Self {
        Self {
            libdirs: Vec::new(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let info = CppInfo::default();
        assert_eq!(info.includedirs, vec!["include"]);
        assert_eq!(info.libdirs, vec!["lib"]);
        assert!(info.libs.is_empty());
        assert!(info.defines.is_empty());
    }

    #[test]
    fn test_header_only_has_no_libdirs() {
        let info = CppInfo::header_only();
        assert!(info.libdirs.is_empty());
        assert_eq!(info.includedirs, vec!["include"]);
    }
}
