//! Binary package identity.
//!
//! A package id captures everything that influences the produced binary:
//! recipe name, version, the participating settings axes and the
//! effective option set. Header-only packages erase settings and options
//! from the id, so a single binary package serves every configuration.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::options::OptionSet;
use crate::settings::Settings;

/// Identity of one binary package in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageId {
    /// Recipe name.
    pub name: String,
    /// Recipe version.
    pub version: String,
    /// Participating settings axes as `(axis, value)` pairs; empty when
    /// erased (header-only packages).
    pub settings: Vec<(String, String)>,
    /// Effective options as `(name, value)` pairs, declaration-ordered.
    pub options: Vec<(String, String)>,
}

impl PackageId {
    /// Full identity: the named settings axes and all effective options
    /// participate. Unknown axis names are ignored.
    pub fn new(
        name: &str,
        version: &str,
        settings: Settings,
        axes: &[&str],
        options: &OptionSet,
    ) -> Self {
        let settings = axes
            .iter()
            .filter_map(|axis| {
                let value = match *axis {
                    "os" => settings.os.to_string(),
                    "arch" => settings.arch.to_string(),
                    "compiler" => settings.compiler.to_string(),
                    "build_type" => settings.build_type.to_string(),
                    _ => return None,
                };
                Some(((*axis).to_string(), value))
            })
            .collect();

        Self {
            name: name.to_string(),
            version: version.to_string(),
            settings,
            options: options
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Settings-independent identity for header-only packages.
    pub fn header_only(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            settings: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Canonical string form, the input to [`digest`](Self::digest).
    pub fn canonical(&self) -> String {
        let mut out = format!("{}/{}", self.name, self.version);
        for (axis, value) in &self.settings {
            out.push('|');
            out.push_str(axis);
            out.push('=');
            out.push_str(value);
        }
        for (name, value) in &self.options {
            out.push('|');
            out.push_str(name);
            out.push('=');
            out.push_str(value);
        }
        out
    }

    /// Stable hex digest identifying the binary package directory.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical().as_bytes());
        let hash = hasher.finalize();
        // Twelve hex chars are plenty for directory names while staying
        // readable in `kiln list` output.
        hex::encode(hash)[..12].to_string()
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}:{}", self.name, self.version, self.digest())
    }
}
