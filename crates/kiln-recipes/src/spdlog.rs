//! spdlog: fast C++ logging library.
//!
//! spdlog can be consumed two ways: header-only (sources distributed
//! as-is, consumers compile everything) or as a compiled library. The
//! choice is an option, and in header-only mode the shared/fPIC options
//! disappear from the effective set -- there is no binary to build, so
//! there is nothing for them to mean.

use kiln_core::{BuildCtx, ConfigureCtx, Recipe, RecipeError, files};
use kiln_schema::{CppInfo, Os, OptionDecl, PackageId, Requirement, SourceArchive};

/// Recipe for [spdlog](https://github.com/gabime/spdlog).
#[derive(Debug, Default)]
pub struct Spdlog;

const VERSIONS: &[(&str, &str)] = &[
    (
        "1.4.1",
        "3291958eb54ed942d1bd3aef1b4f8ccf70566cbc04d34296ec61eb96ceb73cff",
    ),
    (
        "1.4.2",
        "821c85b120ad15d87ca2bc44185fa9091409777c756c9a5cf5a09e270c1b492f",
    ),
];

impl Spdlog {
    fn header_only(ctx_options: &kiln_schema::OptionSet) -> bool {
        ctx_options.get_bool("header_only")
    }
}

impl Recipe for Spdlog {
    fn name(&self) -> &str {
        "spdlog"
    }

    fn description(&self) -> &str {
        "Fast C++ logging library"
    }

    fn homepage(&self) -> &str {
        "https://github.com/gabime/spdlog"
    }

    fn license(&self) -> &str {
        "MIT"
    }

    fn versions(&self) -> Vec<&str> {
        VERSIONS.iter().map(|(v, _)| *v).collect()
    }

    fn option_decls(&self) -> Vec<OptionDecl> {
        vec![
            OptionDecl::boolean("shared", false),
            OptionDecl::boolean("fPIC", true),
            OptionDecl::boolean("header_only", false),
        ]
    }

    fn config_options(&self, ctx: &mut ConfigureCtx) {
        // Position-independent code has no meaning under MSVC.
        if ctx.settings.os == Os::Windows {
            ctx.options.remove("fPIC");
        }
    }

    fn configure(&self, ctx: &mut ConfigureCtx) -> Result<(), RecipeError> {
        if Self::header_only(&ctx.options) {
            ctx.options.remove("shared");
            ctx.options.remove("fPIC");
        } else if ctx.settings.os == Os::Windows && ctx.options.get_bool("shared") {
            return Err(RecipeError::invalid(
                "spdlog shared lib is not yet supported under windows",
            ));
        }
        Ok(())
    }

    fn requirements(&self, _ctx: &ConfigureCtx) -> Vec<Requirement> {
        vec![Requirement::exact("fmt", "6.0.0").expect("static version range")]
    }

    fn source(&self, version: &str) -> Result<SourceArchive, RecipeError> {
        let (_, sha256) = VERSIONS
            .iter()
            .find(|(v, _)| *v == version)
            .ok_or_else(|| RecipeError::UnknownVersion {
                name: self.name().to_string(),
                version: version.to_string(),
            })?;
        Ok(SourceArchive::new(
            &format!("https://github.com/gabime/spdlog/archive/v{version}.tar.gz"),
            sha256,
            &format!("spdlog-{version}"),
        ))
    }

    fn build(&self, ctx: &BuildCtx) -> Result<(), RecipeError> {
        // Header-only packaging ships the source tree; nothing to compile.
        if Self::header_only(&ctx.options) {
            return Ok(());
        }

        let mut cmake = ctx.cmake();
        cmake
            .define_bool("SPDLOG_BUILD_EXAMPLE", false)
            .define_bool("SPDLOG_BUILD_TESTS", false)
            .define_bool("SPDLOG_BUILD_BENCH", false)
            .define_bool("SPDLOG_FMT_EXTERNAL", true)
            .define_bool("SPDLOG_BUILD_SHARED", ctx.options.get_bool("shared"))
            .define_bool("SPDLOG_INSTALL", true);

        cmake.configure(&ctx.env, &ctx.log)?;
        cmake.build(&ctx.env, &ctx.log)
    }

    fn package(&self, ctx: &BuildCtx) -> Result<(), RecipeError> {
        if Self::header_only(&ctx.options) {
            files::copy_tree(
                &ctx.source_folder.join("include"),
                &ctx.package_folder.join("include"),
            )?;
        } else {
            ctx.cmake().install(&ctx.env, &ctx.log)?;
        }

        files::copy_matching(
            &ctx.source_folder,
            &ctx.package_folder.join("licenses"),
            &["LICENSE"],
        )?;

        files::rmdir(&ctx.package_folder.join("lib/cmake"))?;
        files::rmdir(&ctx.package_folder.join("lib/pkgconfig"))?;
        files::rmdir(&ctx.package_folder.join("lib/spdlog/cmake"))?;
        Ok(())
    }

    fn package_id(&self, ctx: &ConfigureCtx) -> PackageId {
        if Self::header_only(&ctx.options) {
            // One header-only package serves every settings combination.
            PackageId::header_only(self.name(), &ctx.version)
        } else {
            PackageId::new(
                self.name(),
                &ctx.version,
                ctx.settings,
                self.settings(),
                &ctx.options,
            )
        }
    }

    fn package_info(&self, ctx: &ConfigureCtx) -> CppInfo {
        if Self::header_only(&ctx.options) {
            return CppInfo {
                defines: vec![
                    "SPDLOG_HEADER_ONLY".to_string(),
                    "SPDLOG_FMT_EXTERNAL".to_string(),
                ],
                ..CppInfo::header_only()
            };
        }

        let mut libs = vec!["spdlog".to_string()];
        if ctx.settings.os == Os::Linux {
            libs.push("pthread".to_string());
        }
        CppInfo {
            libs,
            // The first define keeps the upstream spelling, typo and all;
            // consumers already compile against it.
            defines: vec![
                "SDPLOG_COMPILED_LIB".to_string(),
                "SPDLOG_FMT_EXTERNAL".to_string(),
            ],
            ..CppInfo::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_schema::{OptionSet, OptionValue, Settings};

    fn configured(os: Os, overrides: &[(&str, bool)]) -> Result<ConfigureCtx, RecipeError> {
        let recipe = Spdlog;
        let mut settings = Settings::host();
        settings.os = os;

        let mut options = OptionSet::seed(&recipe.option_decls());
        for (name, value) in overrides {
            options.set(name, OptionValue::Bool(*value)).unwrap();
        }

        let mut ctx = ConfigureCtx {
            version: "1.4.2".to_string(),
            settings,
            options,
        };
        recipe.config_options(&mut ctx);
        recipe.configure(&mut ctx)?;
        Ok(ctx)
    }

    #[test]
    fn test_header_only_removes_shared_and_fpic() {
        let ctx = configured(Os::Linux, &[("header_only", true)]).unwrap();
        assert!(!ctx.options.contains("shared"));
        assert!(!ctx.options.contains("fPIC"));
        assert!(ctx.options.get_bool("header_only"));
    }

    #[test]
    fn test_windows_drops_fpic() {
        let ctx = configured(Os::Windows, &[]).unwrap();
        assert!(!ctx.options.contains("fPIC"));
        assert!(ctx.options.contains("shared"));
    }

    #[test]
    fn test_windows_shared_is_rejected() {
        let err = configured(Os::Windows, &[("shared", true)]).unwrap_err();
        assert!(matches!(err, RecipeError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_windows_header_only_shared_is_fine() {
        // header_only wins: shared is removed before the windows check.
        let ctx = configured(Os::Windows, &[("shared", true), ("header_only", true)]).unwrap();
        assert!(!ctx.options.contains("shared"));
    }

    #[test]
    fn test_header_only_package_info() {
        let recipe = Spdlog;
        let ctx = configured(Os::Linux, &[("header_only", true)]).unwrap();
        let info = recipe.package_info(&ctx);
        assert!(info.libs.is_empty());
        assert_eq!(
            info.defines,
            vec!["SPDLOG_HEADER_ONLY", "SPDLOG_FMT_EXTERNAL"]
        );
    }

    #[test]
    fn test_compiled_package_info_linux() {
        let recipe = Spdlog;
        let ctx = configured(Os::Linux, &[]).unwrap();
        let info = recipe.package_info(&ctx);
        assert_eq!(info.libs, vec!["spdlog", "pthread"]);
        assert_eq!(
            info.defines,
            vec!["SDPLOG_COMPILED_LIB", "SPDLOG_FMT_EXTERNAL"]
        );
    }

    #[test]
    fn test_compiled_package_info_windows_has_no_pthread() {
        let recipe = Spdlog;
        let ctx = configured(Os::Windows, &[]).unwrap();
        let info = recipe.package_info(&ctx);
        assert_eq!(info.libs, vec!["spdlog"]);
    }

    #[test]
    fn test_header_only_package_id_erases_settings() {
        let recipe = Spdlog;
        let linux = configured(Os::Linux, &[("header_only", true)]).unwrap();
        let windows = configured(Os::Windows, &[("header_only", true)]).unwrap();
        assert_eq!(
            recipe.package_id(&linux).digest(),
            recipe.package_id(&windows).digest()
        );
    }

    #[test]
    fn test_compiled_package_id_depends_on_settings() {
        let recipe = Spdlog;
        let linux = configured(Os::Linux, &[]).unwrap();
        let freebsd = configured(Os::Freebsd, &[]).unwrap();
        assert_ne!(
            recipe.package_id(&linux).digest(),
            recipe.package_id(&freebsd).digest()
        );
    }

    #[test]
    fn test_requires_fmt() {
        let recipe = Spdlog;
        let ctx = configured(Os::Linux, &[]).unwrap();
        let reqs = recipe.requirements(&ctx);
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].name, "fmt");
        assert!(reqs[0].matches(&semver_version("6.0.0")));
        assert!(!reqs[0].matches(&semver_version("6.1.0")));
    }

    fn semver_version(s: &str) -> semver::Version {
        s.parse().unwrap()
    }
}
