//! Optional user configuration (`~/.kiln/config.toml`).

use std::path::Path;

use serde::{Deserialize, Serialize};

/// User configuration. Every key is optional; a missing file yields the
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Mirror base URL substituted for upstream archive hosts.
    ///
    /// When set, source downloads go to `<mirror>/<archive filename>`
    /// instead of the upstream URL.
    #[serde(default)]
    pub mirror: Option<String>,

    /// Cap on build parallelism. Defaults to the logical CPU count.
    #[serde(default)]
    pub jobs: Option<usize>,
}

/// Errors raised while loading the config file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Config file path.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file exists but is not valid TOML for the config schema.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Config file path.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

impl Config {
    /// Load the config from `path`, returning defaults when the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file exists but cannot be read
    /// or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Effective build parallelism.
    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Rewrite an upstream URL through the configured mirror, if any.
    pub fn mirrored_url(&self, upstream: &str) -> String {
        match &self.mirror {
            Some(mirror) => {
                let filename = upstream.split('/').next_back().unwrap_or(upstream);
                format!("{}/{}", mirror.trim_end_matches('/'), filename)
            }
            None => upstream.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(Path::new("/nonexistent/kiln/config.toml")).unwrap();
        assert!(config.mirror.is_none());
        assert!(config.jobs() >= 1);
    }

    #[test]
    fn test_parse_and_mirror_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "mirror = \"https://mirror.example.com/archives/\"\njobs = 4\n")
            .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.jobs(), 4);
        assert_eq!(
            config.mirrored_url("https://github.com/gabime/spdlog/archive/v1.4.2.tar.gz"),
            "https://mirror.example.com/archives/v1.4.2.tar.gz"
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "mirror = [not toml").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
