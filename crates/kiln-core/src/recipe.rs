//! The recipe trait: a flat descriptor with framework-dictated lifecycle
//! callbacks.
//!
//! A recipe never drives itself; the [`Driver`](crate::driver::Driver)
//! invokes the callbacks in a fixed order:
//!
//! 1. `option_decls` seeds the option set, user overrides apply on top
//! 2. `config_options` drops options meaningless for the target OS
//! 3. `configure` adjusts across options and rejects unsupported
//!    combinations -- the only place configuration errors originate
//! 4. `requirements` declares dependencies, located in the local store
//! 5. `source` names the archive to fetch and verify
//! 6. `build` and `package` drive the external toolchain
//! 7. `package_id` / `package_info` describe the result

use std::path::{Path, PathBuf};

use kiln_schema::{CppInfo, OptionDecl, OptionSet, PackageId, Requirement, Settings, SourceArchive};

use crate::deps::ResolvedDeps;
use crate::error::RecipeError;
use crate::toolchain::autotools::Autotools;
use crate::toolchain::cmake::Cmake;
use crate::toolchain::env::BuildEnv;

/// Mutable configuration state threaded through the early lifecycle.
#[derive(Debug, Clone)]
pub struct ConfigureCtx {
    /// The recipe version being configured.
    pub version: String,
    /// Target settings for this run.
    pub settings: Settings,
    /// Effective option set; recipes may remove entries during
    /// `config_options` and `configure`.
    pub options: OptionSet,
}

/// Everything a recipe needs during `build` and `package`.
#[derive(Debug)]
pub struct BuildCtx {
    /// The recipe version being built.
    pub version: String,
    /// Target settings for this run.
    pub settings: Settings,
    /// Effective (post-configure) option set.
    pub options: OptionSet,
    /// Extracted source tree.
    pub source_folder: PathBuf,
    /// Out-of-tree build directory.
    pub build_folder: PathBuf,
    /// Install destination; becomes the package in the store.
    pub package_folder: PathBuf,
    /// Package folders of the resolved requirements.
    pub deps: ResolvedDeps,
    /// Environment applied to every tool invocation.
    pub env: BuildEnv,
    /// Build parallelism.
    pub jobs: usize,
    /// Build log file.
    pub log: PathBuf,
}

impl BuildCtx {
    /// A CMake driver preconfigured for this build's folders.
    pub fn cmake(&self) -> Cmake {
        Cmake::new(
            &self.source_folder,
            &self.build_folder,
            &self.package_folder,
            self.settings.build_type,
            self.jobs,
        )
    }

    /// An Autotools driver preconfigured for this build's folders.
    pub fn autotools(&self) -> Autotools {
        Autotools::new(
            &self.source_folder,
            &self.build_folder,
            &self.package_folder,
            self.jobs,
        )
    }

    /// Package folder of a resolved dependency.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::MissingDependency`] when the name was never
    /// declared in `requirements` (and therefore never resolved).
    pub fn dep(&self, name: &str) -> Result<&Path, RecipeError> {
        self.deps.get(name).ok_or_else(|| RecipeError::MissingDependency {
            requirement: name.to_string(),
        })
    }
}

/// A package recipe: how to fetch, configure, build and package one
/// third-party library.
pub trait Recipe: Send + Sync {
    /// Package name as consumers spell it.
    fn name(&self) -> &str;

    /// One-line description.
    fn description(&self) -> &str;

    /// Upstream project homepage.
    fn homepage(&self) -> &str;

    /// SPDX-ish license expression of the packaged library.
    fn license(&self) -> &str;

    /// Versions this recipe can build, newest last.
    fn versions(&self) -> Vec<&str>;

    /// Settings axes participating in the package id.
    fn settings(&self) -> &'static [&'static str] {
        &["os", "arch", "compiler", "build_type"]
    }

    /// Declared options with their domains and defaults.
    fn option_decls(&self) -> Vec<OptionDecl> {
        Vec::new()
    }

    /// Drop options that have no meaning on the target OS.
    fn config_options(&self, _ctx: &mut ConfigureCtx) {}

    /// Adjust options across each other and reject unsupported
    /// combinations before any build work starts.
    fn configure(&self, _ctx: &mut ConfigureCtx) -> Result<(), RecipeError> {
        Ok(())
    }

    /// Dependencies of this recipe under the configured options.
    fn requirements(&self, _ctx: &ConfigureCtx) -> Vec<Requirement> {
        Vec::new()
    }

    /// The source archive for one version.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::UnknownVersion`] for versions the recipe
    /// does not carry.
    fn source(&self, version: &str) -> Result<SourceArchive, RecipeError>;

    /// Compile the library (or no-op for header-only configurations).
    fn build(&self, ctx: &BuildCtx) -> Result<(), RecipeError>;

    /// Install artifacts and licenses into the package folder.
    fn package(&self, ctx: &BuildCtx) -> Result<(), RecipeError>;

    /// Identity of the binary package this configuration produces.
    fn package_id(&self, ctx: &ConfigureCtx) -> PackageId {
        PackageId::new(
            self.name(),
            &ctx.version,
            ctx.settings,
            self.settings(),
            &ctx.options,
        )
    }

    /// Metadata exported to consumers of the packaged library.
    fn package_info(&self, ctx: &ConfigureCtx) -> CppInfo;
}
