//! wxpdfdoc: PDF document generation for wxWidgets applications.

use kiln_core::toolchain::env::dep_tool;
use kiln_core::{BuildCtx, ConfigureCtx, Recipe, RecipeError, files};
use kiln_schema::{CppInfo, Os, Requirement, SourceArchive};

/// Recipe for [wxPdfDocument](https://utelle.github.io/wxpdfdoc/).
#[derive(Debug, Default)]
pub struct WxPdfDoc;

const VERSIONS: &[(&str, &str)] = &[(
    "1.2.0",
    "0fe0a9313a3c0745a3b09f1bdc354e12dcd0a286ca3a3f46b612e76e6673ddcb",
)];

impl Recipe for WxPdfDoc {
    fn name(&self) -> &str {
        "wxpdfdoc"
    }

    fn description(&self) -> &str {
        "wxPdfDocument allows wxWidgets applications to generate PDF documents."
    }

    fn homepage(&self) -> &str {
        "https://utelle.github.io/wxpdfdoc/"
    }

    fn license(&self) -> &str {
        "wxWindows"
    }

    fn versions(&self) -> Vec<&str> {
        VERSIONS.iter().map(|(v, _)| *v).collect()
    }

    fn configure(&self, ctx: &mut ConfigureCtx) -> Result<(), RecipeError> {
        // The wxWidgets dependency is only packaged for Linux so far.
        if ctx.settings.os != Os::Linux {
            return Err(RecipeError::invalid(
                "wxpdfdoc is currently supported on Linux only",
            ));
        }
        Ok(())
    }

    fn requirements(&self, _ctx: &ConfigureCtx) -> Vec<Requirement> {
        // Upstream supports the 3.0.x through 3.2.x series.
        vec![
            Requirement::new("wxwidgets", ">=3.0.0, <3.3")
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
            &format!("https://github.com/utelle/wxpdfdoc/archive/refs/tags/v{version}.tar.gz"),
            sha256,
            &format!("wxpdfdoc-{version}"),
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
            &["LICENCE.txt"],
        )?;

        files::rmdir(&ctx.package_folder.join("lib/pkgconfig"))?;
        Ok(())
    }

    fn package_info(&self, _ctx: &ConfigureCtx) -> CppInfo {
        CppInfo {
            libs: vec!["wxcode_gtk2u_pdfdoc-3.2".to_string()],
            includedirs: vec!["include".to_string()],
            libdirs: vec!["lib".to_string()],
            builddirs: vec!["lib/pkgconfig".to_string()],
            pkg_config_name: Some("wxpdfdoc".to_string()),
            ..CppInfo::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_schema::{OptionSet, Settings};

    fn configured(os: Os) -> Result<ConfigureCtx, RecipeError> {
        let recipe = WxPdfDoc;
        let mut settings = Settings::host();
        settings.os = os;
        let mut ctx = ConfigureCtx {
            version: "1.2.0".to_string(),
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
    fn test_requires_wxwidgets_range() {
        let recipe = WxPdfDoc;
        let ctx = configured(Os::Linux).unwrap();
        let reqs = recipe.requirements(&ctx);
        assert_eq!(reqs.len(), 1);
        let wx = &reqs[0];
        assert_eq!(wx.name, "wxwidgets");
        assert!(wx.transitive_headers);
        assert!(wx.transitive_libs);
        assert!(wx.matches(&"3.2.4".parse().unwrap()));
        assert!(!wx.matches(&"2.8.12".parse().unwrap()));
        assert!(!wx.matches(&"3.3.0".parse().unwrap()));
    }

    #[test]
    fn test_package_info() {
        let recipe = WxPdfDoc;
        let ctx = configured(Os::Linux).unwrap();
        let info = recipe.package_info(&ctx);
        assert_eq!(info.libs, vec!["wxcode_gtk2u_pdfdoc-3.2"]);
        assert_eq!(info.builddirs, vec!["lib/pkgconfig"]);
        assert_eq!(info.pkg_config_name.as_deref(), Some("wxpdfdoc"));
        assert!(info.defines.is_empty());
    }
}
