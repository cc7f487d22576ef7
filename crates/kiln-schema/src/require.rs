//! Versioned dependency declarations.
//!
//! A requirement names another package and a semantic-version range.
//! Resolution of the range happens outside kiln; recipes only declare what
//! they need and whether the dependency's headers and libraries propagate
//! to the consumer's own build.

use semver::VersionReq;
use serde::{Deserialize, Serialize};

/// A dependency declaration on another package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Name of the required package.
    pub name: String,
    /// Semantic version range, e.g. `>=3.0.0, <3.3`.
    pub req: VersionReq,
    /// Whether the dependency's headers are visible to consumers.
    #[serde(default)]
    pub transitive_headers: bool,
    /// Whether consumers link the dependency's libraries.
    #[serde(default)]
    pub transitive_libs: bool,
}

impl Requirement {
    /// Declare a requirement from a version-range string.
    ///
    /// # Errors
    ///
    /// Returns the semver parse error when `req` is not a valid range.
    pub fn new(name: &str, req: &str) -> Result<Self, semver::Error> {
        Ok(Self {
            name: name.to_string(),
            req: req.parse()?,
            transitive_headers: false,
            transitive_libs: false,
        })
    }

    /// Declare an exact-version requirement.
    ///
    /// # Errors
    ///
    /// Returns the semver parse error when `version` is not a valid version.
    pub fn exact(name: &str, version: &str) -> Result<Self, semver::Error> {
        Self::new(name, &format!("={version}"))
    }

    /// Propagate the dependency's headers to consumers.
    pub fn with_transitive_headers(mut self) -> Self {
        self.transitive_headers = true;
        self
    }

    /// Propagate the dependency's libraries to consumers.
    pub fn with_transitive_libs(mut self) -> Self {
        self.transitive_libs = true;
        self
    }

    /// Whether a concrete version satisfies this requirement.
    pub fn matches(&self, version: &semver::Version) -> bool {
        self.req.matches(version)
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.req)
    }
}
