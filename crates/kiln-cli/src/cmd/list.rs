//! List command

use anyhow::Result;
use crossterm::style::Stylize;

use kiln_core::{Layout, PackageMeta};

/// List built-in recipes and the packages installed in the store.
pub fn list() -> Result<()> {
    let lw = 12;

    println!();
    println!("  {}", "recipes".white().bold());
    for recipe in kiln_recipes::builtin() {
        let versions = recipe.versions().join(", ");
        println!("  {:<lw$}{}", recipe.name(), versions.dark_grey());
    }

    let layout = Layout::default_home();
    let installed = installed_packages(&layout);
    if !installed.is_empty() {
        println!();
        println!("  {}", "installed".white().bold());
        for meta in installed {
            println!(
                "  {:<lw$}{} {}",
                meta.name,
                meta.version,
                meta.id.as_str().dark_grey()
            );
        }
    }

    Ok(())
}

fn installed_packages(layout: &Layout) -> Vec<PackageMeta> {
    let mut found = Vec::new();

    let Ok(names) = std::fs::read_dir(layout.store()) else {
        return found;
    };
    for name in names.filter_map(Result::ok) {
        let Ok(versions) = std::fs::read_dir(name.path()) else {
            continue;
        };
        for version in versions.filter_map(Result::ok) {
            let Ok(ids) = std::fs::read_dir(version.path()) else {
                continue;
            };
            for id in ids.filter_map(Result::ok) {
                if let Ok(meta) = PackageMeta::load(&id.path()) {
                    found.push(meta);
                }
            }
        }
    }

    found.sort_by(|a, b| (&a.name, &a.version).cmp(&(&b.name, &b.version)));
    found
}
