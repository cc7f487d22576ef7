//! Info command: configuration and consumer metadata without building.

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use serde::Serialize;

use kiln_core::{Config, Driver, Layout};
use kiln_schema::{CppInfo, Requirement, Settings};

use crate::{find_recipe, parse_overrides, parse_spec};

#[derive(Debug, Serialize)]
struct InfoReport {
    name: String,
    version: String,
    description: String,
    homepage: String,
    license: String,
    settings: Settings,
    options: Vec<(String, String)>,
    requirements: Vec<Requirement>,
    package_id: String,
    cpp_info: CppInfo,
}

/// Show the effective configuration for a recipe.
///
/// Runs only the configuration phase: validation errors surface exactly
/// as they would for `kiln create`, but nothing is fetched or built.
pub fn info(spec: &str, options: &[String], settings: &[String], json: bool) -> Result<()> {
    let (name, version) = parse_spec(spec);
    let recipe = find_recipe(name)?;
    let option_overrides = parse_overrides(options)?;
    let settings_overrides = parse_overrides(settings)?;

    let layout = Layout::default_home();
    let config =
        Config::load(&layout.config_file()).context("Failed to load kiln configuration")?;
    let driver = Driver::new(layout, config);

    let ctx = driver.configure(
        recipe.as_ref(),
        version,
        &settings_overrides,
        &option_overrides,
    )?;

    let report = InfoReport {
        name: recipe.name().to_string(),
        version: ctx.version.clone(),
        description: recipe.description().to_string(),
        homepage: recipe.homepage().to_string(),
        license: recipe.license().to_string(),
        settings: ctx.settings,
        options: ctx
            .options
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect(),
        requirements: recipe.requirements(&ctx),
        package_id: recipe.package_id(&ctx).digest(),
        cpp_info: recipe.package_info(&ctx),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let lw = 14;
    println!();
    println!(
        "  {} {}",
        report.name.as_str().white().bold(),
        report.version.as_str().dark_grey()
    );
    if !report.description.is_empty() {
        println!("  {}", report.description);
    }
    println!();
    println!("  {:<lw$}{}", "homepage", report.homepage);
    println!("  {:<lw$}{}", "license", report.license);
    println!("  {:<lw$}{}", "settings", report.settings);

    if !report.options.is_empty() {
        let rendered: Vec<String> = report
            .options
            .iter()
            .map(|(n, v)| format!("{n}={v}"))
            .collect();
        println!("  {:<lw$}{}", "options", rendered.join(" "));
    }
    if !report.requirements.is_empty() {
        let rendered: Vec<String> = report.requirements.iter().map(ToString::to_string).collect();
        println!("  {:<lw$}{}", "requires", rendered.join(", "));
    }

    println!("  {:<lw$}{}", "package id", report.package_id);
    if !report.cpp_info.libs.is_empty() {
        println!("  {:<lw$}{}", "libs", report.cpp_info.libs.join(", "));
    }
    if !report.cpp_info.defines.is_empty() {
        println!("  {:<lw$}{}", "defines", report.cpp_info.defines.join(", "));
    }
    if let Some(pc) = &report.cpp_info.pkg_config_name {
        println!("  {:<lw$}{}", "pkg-config", pc);
    }

    Ok(())
}
