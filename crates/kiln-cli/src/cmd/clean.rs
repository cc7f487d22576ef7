//! Clean command

use anyhow::Result;
use crossterm::style::Stylize;

use kiln_core::Layout;

/// Remove downloaded archives and scratch directories.
///
/// The store (installed packages) is deliberately left alone.
pub fn clean() -> Result<()> {
    let layout = Layout::default_home();
    let mut removed = 0u64;

    for dir in [layout.cache(), layout.src(), layout.build(), layout.logs()] {
        if dir.exists() {
            removed += dir_size(&dir);
            std::fs::remove_dir_all(&dir)?;
            println!("  removed {}", dir.display());
        }
    }

    if removed == 0 {
        println!("  nothing to clean");
    } else {
        println!("  {} freed", format_size(removed).white().bold());
    }
    Ok(())
}

fn dir_size(dir: &std::path::Path) -> u64 {
    walkdir_size(dir).unwrap_or(0)
}

fn walkdir_size(dir: &std::path::Path) -> std::io::Result<u64> {
    let mut total = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if meta.is_dir() {
            total += walkdir_size(&entry.path())?;
        } else {
            total += meta.len();
        }
    }
    Ok(total)
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }
}
