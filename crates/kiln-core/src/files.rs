//! Filesystem helpers recipes call during packaging.

use std::path::Path;

use walkdir::WalkDir;

/// Copy named files found anywhere under `src_dir` into `dst_dir` (flat).
///
/// Used for license files, which upstream projects keep at varying depths.
/// Returns how many files were copied; absent names are skipped silently.
pub fn copy_matching(src_dir: &Path, dst_dir: &Path, names: &[&str]) -> std::io::Result<usize> {
    std::fs::create_dir_all(dst_dir)?;
    let mut copied = 0;

    for name in names {
        let found = WalkDir::new(src_dir)
            .into_iter()
            .filter_map(Result::ok)
            .find(|e| e.file_type().is_file() && e.file_name().to_string_lossy() == *name);

        if let Some(entry) = found {
            std::fs::copy(entry.path(), dst_dir.join(name))?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Recursively copy a directory tree from `src` into `dst`.
///
/// `dst` receives the *contents* of `src` (not `src` itself), creating
/// directories as needed and overwriting existing files.
pub fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    fs_extra::dir::copy(
        src,
        dst,
        &fs_extra::dir::CopyOptions::new().content_only(true).overwrite(true),
    )
    .map_err(|e| std::io::Error::other(format!("Copy failed: {e}")))?;
    Ok(())
}

/// Remove a directory tree if it exists.
///
/// Recipes prune build-system leftovers (`lib/cmake`, `lib/pkgconfig`)
/// whether or not the build produced them.
pub fn rmdir(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        std::fs::remove_dir_all(path)?;
    }
    Ok(())
}

/// Collect the link names of libraries installed under `<package>/lib`.
///
/// `libspdlog.a`, `libspdlog.so.1.4.2` and `libspdlog.dylib` all yield
/// `spdlog`; `spdlog.lib` (MSVC) yields `spdlog`. The result is sorted
/// and de-duplicated.
pub fn collect_libs(package_folder: &Path) -> Vec<String> {
    let lib_dir = package_folder.join("lib");
    let mut libs: Vec<String> = Vec::new();

    for entry in WalkDir::new(&lib_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let file_name = entry.file_name().to_string_lossy();
        if let Some(lib) = link_name(&file_name) {
            libs.push(lib);
        }
    }

    libs.sort();
    libs.dedup();
    libs
}

fn link_name(file_name: &str) -> Option<String> {
    if let Some(rest) = file_name.strip_prefix("lib") {
        if let Some(pos) = rest.find(".so") {
            return Some(rest[..pos].to_string());
        }
        if let Some(name) = rest.strip_suffix(".a").or_else(|| rest.strip_suffix(".dylib")) {
            return Some(name.to_string());
        }
        return None;
    }
    file_name.strip_suffix(".lib").map(ToString::to_string)
}
