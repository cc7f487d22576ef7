//! The lifecycle driver: runs a recipe's callbacks in the framework order.

use std::path::PathBuf;

use kiln_schema::{CppInfo, OptionSet, OptionValue, PackageId};

use crate::config::Config;
use crate::deps::ResolvedDeps;
use crate::error::RecipeError;
use crate::io::fetch;
use crate::metadata::PackageMeta;
use crate::paths::Layout;
use crate::recipe::{BuildCtx, ConfigureCtx, Recipe};
use crate::toolchain::env::BuildEnv;

/// Result of a completed packaging run.
#[derive(Debug)]
pub struct BuildOutcome {
    /// Identity of the produced binary package.
    pub package_id: PackageId,
    /// Where the package was installed.
    pub package_folder: PathBuf,
    /// Metadata exported to consumers.
    pub cpp_info: CppInfo,
}

/// Drives recipes through their lifecycle against one kiln home.
#[derive(Debug)]
pub struct Driver {
    layout: Layout,
    config: Config,
    client: reqwest::Client,
}

impl Driver {
    /// A driver rooted at `layout` with the given configuration.
    pub fn new(layout: Layout, config: Config) -> Self {
        Self {
            layout,
            config,
            client: reqwest::Client::new(),
        }
    }

    /// The layout this driver operates on.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Run the configuration phase: seed options, apply user overrides,
    /// then let the recipe adjust and validate.
    ///
    /// This is the only phase that can produce
    /// [`RecipeError::InvalidConfiguration`], and it runs to completion
    /// before any network or build side effect.
    pub fn configure(
        &self,
        recipe: &dyn Recipe,
        version: Option<&str>,
        settings_overrides: &[(String, String)],
        option_overrides: &[(String, String)],
    ) -> Result<ConfigureCtx, RecipeError> {
        let versions = recipe.versions();
        let version = match version {
            Some(v) => {
                if !versions.contains(&v) {
                    return Err(RecipeError::UnknownVersion {
                        name: recipe.name().to_string(),
                        version: v.to_string(),
                    });
                }
                v.to_string()
            }
            // Versions are declared newest-last.
            None => versions
                .last()
                .map(ToString::to_string)
                .ok_or_else(|| RecipeError::UnknownVersion {
                    name: recipe.name().to_string(),
                    version: "(none declared)".to_string(),
                })?,
        };

        let mut settings = kiln_schema::Settings::host();
        for (key, value) in settings_overrides {
            settings.set(key, value)?;
        }

        let mut options = OptionSet::seed(&recipe.option_decls());
        for (key, value) in option_overrides {
            let value: OptionValue = value.parse().unwrap_or(OptionValue::Str(value.clone()));
            options.set(key, value)?;
        }

        let mut ctx = ConfigureCtx {
            version,
            settings,
            options,
        };
        recipe.config_options(&mut ctx);
        recipe.configure(&mut ctx)?;

        tracing::debug!(
            recipe = recipe.name(),
            version = %ctx.version,
            settings = %ctx.settings,
            home = %self.layout.root().display(),
            "configured"
        );
        Ok(ctx)
    }

    /// Run the remaining lifecycle for a configured recipe: locate
    /// dependencies, fetch and extract the source, build, package, and
    /// record metadata in the store.
    pub async fn create(
        &self,
        recipe: &dyn Recipe,
        ctx: &ConfigureCtx,
    ) -> Result<BuildOutcome, RecipeError> {
        let name = recipe.name();
        let version = ctx.version.as_str();

        let requirements = recipe.requirements(ctx);
        let deps = ResolvedDeps::resolve(&self.layout.store(), &requirements)?;

        let archive = recipe.source(version)?;
        let url = self.config.mirrored_url(&archive.url);
        let source_folder = self.layout.source_folder(name, version);
        fetch::fetch_source(&self.client, &archive, &url, &self.layout.cache(), &source_folder)
            .await?;

        let package_id = recipe.package_id(ctx);
        let package_folder = self.layout.package_folder(name, version, &package_id.digest());
        if package_folder.exists() {
            std::fs::remove_dir_all(&package_folder)?;
        }
        std::fs::create_dir_all(&package_folder)?;

        let build_folder = self.layout.build_folder(name, version);
        std::fs::create_dir_all(&build_folder)?;

        let build_ctx = BuildCtx {
            version: ctx.version.clone(),
            settings: ctx.settings,
            options: ctx.options.clone(),
            source_folder,
            build_folder,
            package_folder: package_folder.clone(),
            env: BuildEnv::from_deps(&deps),
            deps,
            jobs: self.config.jobs(),
            log: self.layout.build_log(name, version),
        };

        tracing::info!(recipe = name, version, id = %package_id.digest(), "building");
        recipe.build(&build_ctx)?;
        recipe.package(&build_ctx)?;

        let cpp_info = recipe.package_info(ctx);
        PackageMeta {
            name: name.to_string(),
            version: version.to_string(),
            id: package_id.digest(),
            cpp_info: cpp_info.clone(),
        }
        .save(&package_folder)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

        tracing::info!(recipe = name, version, folder = %package_folder.display(), "packaged");
        Ok(BuildOutcome {
            package_id,
            package_folder,
            cpp_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use kiln_schema::{OptionDecl, Requirement, SourceArchive};
    use sha2::Digest;
    use std::io::Write;

    struct DemoRecipe {
        url: String,
        sha256: String,
        reject: bool,
    }

    impl Recipe for DemoRecipe {
        fn name(&self) -> &str {
            "demo"
        }
        fn description(&self) -> &str {
            "A demo library"
        }
        fn homepage(&self) -> &str {
            "https://example.com/demo"
        }
        fn license(&self) -> &str {
            "MIT"
        }
        fn versions(&self) -> Vec<&str> {
            vec!["0.9.0", "1.0.0"]
        }
        fn option_decls(&self) -> Vec<OptionDecl> {
            vec![OptionDecl::boolean("shared", false)]
        }
        fn configure(&self, ctx: &mut ConfigureCtx) -> Result<(), RecipeError> {
            if self.reject && ctx.options.get_bool("shared") {
                return Err(RecipeError::invalid("shared build is not supported"));
            }
            Ok(())
        }
        fn source(&self, version: &str) -> Result<SourceArchive, RecipeError> {
            if version != "1.0.0" {
                return Err(RecipeError::UnknownVersion {
                    name: "demo".to_string(),
                    version: version.to_string(),
                });
            }
            Ok(SourceArchive::new(&self.url, &self.sha256, "demo-1.0.0"))
        }
        fn build(&self, ctx: &BuildCtx) -> Result<(), RecipeError> {
            // Stand-in for a toolchain invocation.
            std::fs::write(ctx.build_folder.join("compiled.txt"), b"ok")?;
            Ok(())
        }
        fn package(&self, ctx: &BuildCtx) -> Result<(), RecipeError> {
            let include = ctx.package_folder.join("include");
            std::fs::create_dir_all(&include)?;
            std::fs::copy(
                ctx.source_folder.join("demo.h"),
                include.join("demo.h"),
            )?;
            Ok(())
        }
        fn package_info(&self, _ctx: &ConfigureCtx) -> CppInfo {
            CppInfo::header_only()
        }
    }

    fn tar_gz_bytes() -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        let content = b"#pragma once\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "demo-1.0.0/demo.h", &content[..])
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let body = tar_gz_bytes();
        let sha256 = hex::encode(sha2::Sha256::digest(&body));

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/demo-1.0.0.tar.gz")
            .with_status(200)
            .with_body(&body)
            .create_async()
            .await;

        let home = tempfile::tempdir().unwrap();
        let driver = Driver::new(Layout::new(home.path()), Config::default());
        let recipe = DemoRecipe {
            url: format!("{}/demo-1.0.0.tar.gz", server.url()),
            sha256,
            reject: false,
        };

        let ctx = driver.configure(&recipe, None, &[], &[]).unwrap();
        assert_eq!(ctx.version, "1.0.0");

        let outcome = driver.create(&recipe, &ctx).await.unwrap();
        assert!(outcome.package_folder.join("include/demo.h").exists());

        let meta = PackageMeta::load(&outcome.package_folder).unwrap();
        assert_eq!(meta.name, "demo");
        assert_eq!(meta.id, outcome.package_id.digest());
    }

    #[tokio::test]
    async fn test_configure_rejects_before_any_side_effect() {
        let home = tempfile::tempdir().unwrap();
        let driver = Driver::new(Layout::new(home.path()), Config::default());
        // No server at all: if configuration tried to fetch, this would
        // fail differently.
        let recipe = DemoRecipe {
            url: "http://127.0.0.1:1/unreachable.tar.gz".to_string(),
            sha256: "0".repeat(64),
            reject: true,
        };

        let err = driver
            .configure(
                &recipe,
                None,
                &[],
                &[("shared".to_string(), "true".to_string())],
            )
            .unwrap_err();
        assert!(matches!(err, RecipeError::InvalidConfiguration { .. }));
        assert!(!home.path().join("cache").exists());
        assert!(!home.path().join("src").exists());
    }

    #[test]
    fn test_configure_rejects_unknown_version() {
        let home = tempfile::tempdir().unwrap();
        let driver = Driver::new(Layout::new(home.path()), Config::default());
        let recipe = DemoRecipe {
            url: String::new(),
            sha256: String::new(),
            reject: false,
        };

        let err = driver
            .configure(&recipe, Some("2.0.0"), &[], &[])
            .unwrap_err();
        assert!(matches!(err, RecipeError::UnknownVersion { .. }));
    }

    #[tokio::test]
    async fn test_create_fails_on_missing_dependency() {
        struct NeedsDep;
        impl Recipe for NeedsDep {
            fn name(&self) -> &str {
                "needy"
            }
            fn description(&self) -> &str {
                ""
            }
            fn homepage(&self) -> &str {
                ""
            }
            fn license(&self) -> &str {
                ""
            }
            fn versions(&self) -> Vec<&str> {
                vec!["1.0.0"]
            }
            fn requirements(&self, _ctx: &ConfigureCtx) -> Vec<Requirement> {
                vec![Requirement::new("wxwidgets", ">=3.0.0, <3.3").unwrap()]
            }
            fn source(&self, _version: &str) -> Result<SourceArchive, RecipeError> {
                unreachable!("dependency lookup must fail first")
            }
            fn build(&self, _ctx: &BuildCtx) -> Result<(), RecipeError> {
                Ok(())
            }
            fn package(&self, _ctx: &BuildCtx) -> Result<(), RecipeError> {
                Ok(())
            }
            fn package_info(&self, _ctx: &ConfigureCtx) -> CppInfo {
                CppInfo::default()
            }
        }

        let home = tempfile::tempdir().unwrap();
        let driver = Driver::new(Layout::new(home.path()), Config::default());
        let ctx = driver.configure(&NeedsDep, None, &[], &[]).unwrap();
        let err = driver.create(&NeedsDep, &ctx).await.unwrap_err();
        assert!(matches!(err, RecipeError::MissingDependency { .. }));
    }
}
