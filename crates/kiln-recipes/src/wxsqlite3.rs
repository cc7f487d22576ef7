//! wxSQLite3: a C++ wrapper around SQLite for wxWidgets applications.

use kiln_core::toolchain::env::dep_tool;
use kiln_core::{BuildCtx, ConfigureCtx, Recipe, RecipeError, files};
use kiln_schema::{CppInfo, Os, Requirement, SourceArchive};

/// Recipe for [wxSQLite3](https://utelle.github.io/wxsqlite3/docs/html/index.html).
#[derive(Debug, Default)]
pub struct WxSqlite3;

const VERSIONS: &[(&str, &str)] = &[(
    "4.9.5",
    "76f791e53d6e0649d17fdee16a9b0d25e25e03be5c088b7de499de6dd3e7e0b4",
)];

/// License documents shipped by upstream; all of them travel with the
/// package.
const LICENSE_FILES: &[&str] = &[
    "COPYING.txt",
    "GPL-3.0.txt",
    "LGPL-3.0.txt",
    "LICENSE.spdx",
    "LICENSE.txt",
    "WxWindows-exception-3.1.txt",
];

impl Recipe for WxSqlite3 {
    fn name(&self) -> &str {
        "wxsqlite3"
    }

    fn description(&self) -> &str {
        "wxSQLite3 is a C++ wrapper around the SQLite database designed for use in wxWidgets applications."
    }

    fn homepage(&self) -> &str {
        "https://utelle.github.io/wxsqlite3/docs/html/index.html"
    }

    fn license(&self) -> &str {
        "LGPL-3.0+ WITH WxWindows-exception-3.1"
    }

    fn versions(&self) -> Vec<&str> {
        VERSIONS.iter().map(|(v, _)| *v).collect()
    }

    fn configure(&self, ctx: &mut ConfigureCtx) -> Result<(), RecipeError> {
        // The wxWidgets dependency is only packaged for Linux so far.
        if ctx.settings.os != Os::Linux {
            return Err(RecipeError::invalid(
                "wxsqlite3 is currently supported on Linux only",
            ));
        }
        Ok(())
    }

    fn requirements(&self, _ctx: &ConfigureCtx) -> Vec<Requirement> {
        // Upstream pins [>=2.8 <3.2] but builds fine against 3.2.
        vec![
            Requirement::new("wxwidgets", ">=2.8.0, <3.3")
                .expect("static version range")
                .with_transitive_headers()
                .with_transitive_libs(),
        ]
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
            &format!("https://github.com/utelle/wxsqlite3/archive/refs/tags/v{version}.tar.gz"),
            sha256,
            &format!("wxsqlite3-{version}"),
        ))
    }

    fn build(&self, ctx: &BuildCtx) -> Result<(), RecipeError> {
        let wxwidgets = ctx.dep("wxwidgets")?;
        let wx_config = dep_tool(wxwidgets, "wx-config");

        let autotools = ctx.autotools();
        autotools.autoreconf(&ctx.env, &ctx.log)?;
        autotools.configure(
            &[format!("--with-wx-config={}", wx_config.display())],
            &ctx.env,
            &ctx.log,
        )?;
        autotools.make(&ctx.env, &ctx.log)
    }

    fn package(&self, ctx: &BuildCtx) -> Result<(), RecipeError> {
        ctx.autotools().install(&ctx.env, &ctx.log)?;

        files::copy_matching(
            &ctx.source_folder,
            &ctx.package_folder.join("licenses"),
            LICENSE_FILES,
        )?;

        files::rmdir(&ctx.package_folder.join("lib/pkgconfig"))?;
        Ok(())
    }

    fn package_info(&self, _ctx: &ConfigureCtx) -> CppInfo {
        CppInfo {
            libs: vec!["wxcode_gtk2u_wxsqlite3-3.2".to_string()],
            includedirs: vec!["include".to_string()],
            libdirs: vec!["lib".to_string()],
            builddirs: vec!["lib/pkgconfig".to_string()],
            pkg_config_name: Some("wxsqlite3".to_string()),
            ..CppInfo::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_schema::{OptionSet, Settings};

    fn configured(os: Os) -> Result<ConfigureCtx, RecipeError> {
        let recipe = WxSqlite3;
        let mut settings = Settings::host();
        settings.os = os;
        let mut ctx = ConfigureCtx {
            version: "4.9.5".to_string(),
            settings,
            options: OptionSet::seed(&recipe.option_decls()),
        };
        recipe.config_options(&mut ctx);
        recipe.configure(&mut ctx)?;
        Ok(ctx)
    }

    #[test]
    fn test_linux_is_accepted() {
        assert!(configured(Os::Linux).is_ok());
    }

    #[test]
    fn test_non_linux_is_rejected() {
        for os in [Os::Macos, Os::Windows, Os::Freebsd] {
            let err = configured(os).unwrap_err();
            assert!(
                matches!(err, RecipeError::InvalidConfiguration { .. }),
                "{os} must be rejected"
            );
        }
    }

    #[test]
    fn test_requires_wider_wxwidgets_range_than_wxpdfdoc() {
        let recipe = WxSqlite3;
        let ctx = configured(Os::Linux).unwrap();
        let reqs = recipe.requirements(&ctx);
        let wx = &reqs[0];
        assert!(wx.matches(&"2.8.0".parse().unwrap()));
        assert!(wx.matches(&"3.2.4".parse().unwrap()));
        assert!(!wx.matches(&"3.3.0".parse().unwrap()));
    }

    #[test]
    fn test_package_info() {
        let recipe = WxSqlite3;
        let ctx = configured(Os::Linux).unwrap();
        let info = recipe.package_info(&ctx);
        assert_eq!(info.libs, vec!["wxcode_gtk2u_wxsqlite3-3.2"]);
        assert_eq!(info.pkg_config_name.as_deref(), Some("wxsqlite3"));
    }

    #[test]
    fn test_all_upstream_license_files_travel() {
        assert_eq!(LICENSE_FILES.len(), 6);
        assert!(LICENSE_FILES.contains(&"WxWindows-exception-3.1.txt"));
    }
}
