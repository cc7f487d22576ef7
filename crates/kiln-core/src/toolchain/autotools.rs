//! Autotools driver: autoreconf / configure / make / make install.

use std::path::{Path, PathBuf};

use crate::error::RecipeError;
use crate::toolchain::env::BuildEnv;
use crate::toolchain::run_tool;

/// An autotools-style build: the configure script lives in the source
/// tree, the build runs out-of-tree in the build folder, and artifacts
/// install under the package folder via `--prefix`.
#[derive(Debug)]
pub struct Autotools {
    source_dir: PathBuf,
    build_dir: PathBuf,
    install_prefix: PathBuf,
    jobs: usize,
}

impl Autotools {
    /// Set up an autotools build of `source_dir` in `build_dir`,
    /// installing under `install_prefix`.
    pub fn new(source_dir: &Path, build_dir: &Path, install_prefix: &Path, jobs: usize) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            build_dir: build_dir.to_path_buf(),
            install_prefix: install_prefix.to_path_buf(),
            jobs,
        }
    }

    /// The exact `configure` invocation for the given extra arguments.
    pub fn configure_args(&self, extra: &[String]) -> Vec<String> {
        let mut args = vec![format!("--prefix={}", self.install_prefix.display())];
        args.extend_from_slice(extra);
        args
    }

    /// Regenerate the configure script (`autoreconf -fiv` in the source tree).
    pub fn autoreconf(&self, env: &BuildEnv, log: &Path) -> Result<(), RecipeError> {
        run_tool(
            "autoreconf",
            &["-fiv".to_string()],
            &self.source_dir,
            env,
            log,
        )
    }

    /// Run `configure` from the build folder with `--prefix` plus `extra`.
    pub fn configure(&self, extra: &[String], env: &BuildEnv, log: &Path) -> Result<(), RecipeError> {
        std::fs::create_dir_all(&self.build_dir)?;
        // The configure script is invoked by absolute path so the build
        // stays out-of-tree.
        let script = self.source_dir.join("configure");
        run_tool(
            &script.display().to_string(),
            &self.configure_args(extra),
            &self.build_dir,
            env,
            log,
        )
    }

    /// Run `make -j<jobs>`.
    pub fn make(&self, env: &BuildEnv, log: &Path) -> Result<(), RecipeError> {
        run_tool(
            "make",
            &[format!("-j{}", self.jobs)],
            &self.build_dir,
            env,
            log,
        )
    }

    /// Run `make install`.
    pub fn install(&self, env: &BuildEnv, log: &Path) -> Result<(), RecipeError> {
        run_tool(
            "make",
            &["install".to_string()],
            &self.build_dir,
            env,
            log,
        )
    }
}
