//! Source archive declarations: URL, checksum and layout.

use serde::{Deserialize, Serialize};

/// One downloadable source archive for a recipe version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceArchive {
    /// Upstream download URL.
    pub url: String,
    /// SHA-256 digest of the archive, lowercase hex.
    pub sha256: String,
    /// The single top-level directory inside the archive, stripped during
    /// extraction so the source tree lands directly in the source folder.
    #[serde(default)]
    pub strip_prefix: Option<String>,
}

/// Errors raised while validating a [`SourceArchive`].
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// A required field (URL or digest) is empty.
    #[error("Empty field: {0}")]
    EmptyField(&'static str),

    /// The download URL is malformed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The SHA-256 digest is not 64 lowercase hex characters.
    #[error("Invalid SHA256 digest: {0}")]
    InvalidDigest(String),
}

impl SourceArchive {
    /// Declare an archive with a stripped top-level directory.
    pub fn new(url: &str, sha256: &str, strip_prefix: &str) -> Self {
        Self {
            url: url.to_string(),
            sha256: sha256.to_string(),
            strip_prefix: Some(strip_prefix.to_string()),
        }
    }

    /// Validate URL scheme and digest shape before any network work.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] describing the first violated field.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.url.is_empty() {
            return Err(SourceError::EmptyField("url"));
        }
        if !self.url.starts_with("http") {
            return Err(SourceError::InvalidUrl(self.url.clone()));
        }
        if self.sha256.is_empty() {
            return Err(SourceError::EmptyField("sha256"));
        }
        if self.sha256.len() != 64 || !self.sha256.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SourceError::InvalidDigest(self.sha256.clone()));
        }
        Ok(())
    }

    /// Filename component of the URL (`spdlog-1.4.2.tar.gz`).
    pub fn filename(&self) -> &str {
        self.url.split('/').next_back().unwrap_or("")
    }
}
