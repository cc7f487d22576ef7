//! kiln - source builds for C/C++ libraries
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Fetches upstream source archives, drives an external toolchain
//! (CMake or Autotools), and installs the results into a local store
//! together with the metadata consumers need (library names, include
//! and lib directories, preprocessor defines).
//!
//! # Directory Layout
//!
//! ```text
//! ~/.kiln/
//! ├── store/      # Installed packages by name/version/package-id
//! ├── src/        # Extracted source trees
//! ├── build/      # Out-of-tree build directories
//! ├── cache/      # Downloaded archives by digest
//! ├── logs/       # Build logs
//! └── config.toml
//! ```

pub mod cmd;

// Re-exports from other crates for convenience
pub use kiln_core::io::download as downloader;
pub use kiln_core::io::extract as extractor;
pub use kiln_core::{Config, Driver, Layout, Recipe, RecipeError, kiln_home};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "kiln")]
#[command(author, about = "kiln - source builds for C/C++ libraries")]
#[command(version = env!("KILN_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a package from source and install it into the store
    Create {
        /// Package spec: name, or name@version
        spec: String,
        /// Option override, repeatable: -o shared=true
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
        /// Settings override, repeatable: -s os=linux
        #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
        settings: Vec<String>,
    },
    /// Show effective configuration and consumer metadata for a recipe
    Info {
        /// Package spec: name, or name@version
        spec: String,
        /// Option override, repeatable: -o header_only=true
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
        /// Settings override, repeatable: -s os=windows
        #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
        settings: Vec<String>,
        /// Emit machine-readable JSON instead of the human summary
        #[arg(long)]
        json: bool,
    },
    /// List built-in recipes and installed packages
    List,
    /// Remove downloaded archives and scratch build directories
    Clean,
}

/// Split a package spec into name and optional version.
///
/// # Example
///
/// ```
/// use kiln_cli::parse_spec;
///
/// assert_eq!(parse_spec("spdlog"), ("spdlog", None));
/// assert_eq!(parse_spec("spdlog@1.4.2"), ("spdlog", Some("1.4.2")));
/// ```
pub fn parse_spec(spec: &str) -> (&str, Option<&str>) {
    match spec.split_once('@') {
        Some((name, version)) => (name, Some(version)),
        None => (spec, None),
    }
}

/// Parse repeated `KEY=VALUE` override flags.
pub fn parse_overrides(items: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    items
        .iter()
        .map(|item| match item.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => bail!("Override '{item}' is not of the form KEY=VALUE"),
        })
        .collect()
}

/// Look up a built-in recipe, with a helpful error for typos.
pub fn find_recipe(name: &str) -> anyhow::Result<Box<dyn Recipe>> {
    kiln_recipes::find(name).with_context(|| {
        let known: Vec<String> = kiln_recipes::builtin()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        format!("Unknown recipe '{name}' (known: {})", known.join(", "))
    })
}
