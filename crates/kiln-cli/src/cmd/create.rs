//! Create command: run the full lifecycle for one recipe.

use anyhow::{Context, Result};
use crossterm::style::Stylize;

use kiln_core::{Config, Driver, Layout};

use crate::{find_recipe, parse_overrides, parse_spec};

/// Build a package from source and install it into the store.
pub async fn create(spec: &str, options: &[String], settings: &[String]) -> Result<()> {
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

    println!(
        "  {} {}",
        recipe.name().white().bold(),
        ctx.version.clone().dark_grey()
    );
    let outcome = driver.create(recipe.as_ref(), &ctx).await?;

    let lw = 12;
    println!();
    println!("  {:<lw$}{}", "id", outcome.package_id.digest());
    println!(
        "  {:<lw$}{}",
        "folder",
        outcome.package_folder.display()
    );
    if !outcome.cpp_info.libs.is_empty() {
        println!("  {:<lw$}{}", "libs", outcome.cpp_info.libs.join(", "));
    }
    if !outcome.cpp_info.defines.is_empty() {
        println!(
            "  {:<lw$}{}",
            "defines",
            outcome.cpp_info.defines.join(", ")
        );
    }

    Ok(())
}
