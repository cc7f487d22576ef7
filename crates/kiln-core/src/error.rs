//! Recipe lifecycle errors.

use kiln_schema::{OptionError, SettingsError, SourceError};

use crate::io::download::DownloadError;
use crate::io::extract::ExtractError;

/// Errors surfaced by the recipe lifecycle.
///
/// `InvalidConfiguration` is the only error kiln raises on its own
/// judgement, and always before any fetch or build step runs. Everything
/// else wraps a failure reported by an external collaborator (network,
/// archive, build tool) and propagates it unmodified.
#[derive(thiserror::Error, Debug)]
pub enum RecipeError {
    /// The requested settings/options combination is unsupported.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Why the combination is rejected.
        reason: String,
    },

    /// The recipe has no source archive for the requested version.
    #[error("Recipe '{name}' has no version {version}")]
    UnknownVersion {
        /// Recipe name.
        name: String,
        /// The requested version.
        version: String,
    },

    /// A declared requirement has no matching package in the local store.
    #[error("No cached package satisfies requirement '{requirement}'")]
    MissingDependency {
        /// The unsatisfied requirement, rendered as `name/range`.
        requirement: String,
    },

    /// Settings override failed (`-s key=value`).
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Option assignment failed (`-o key=value`).
    #[error(transparent)]
    Option(#[from] OptionError),

    /// A source archive declaration is malformed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Download failed or the archive digest did not match.
    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    /// Archive extraction failed.
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// A required build tool is not on PATH.
    #[error("Required tool '{0}' not found on PATH")]
    ToolNotFound(String),

    /// An external build tool exited with a failure status.
    #[error("{program} failed with exit code {code:?} (log: {log})")]
    Toolchain {
        /// The program that failed (`cmake`, `make`, ...).
        program: String,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Build log path for the full output.
        log: String,
    },

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecipeError {
    /// Shorthand for an [`InvalidConfiguration`](Self::InvalidConfiguration) error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
