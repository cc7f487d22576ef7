//! Source archive extraction.
//!
//! Handles the formats upstream projects actually release: `.tar.gz` and
//! `.zip`. Release archives wrap everything in a single top-level
//! directory (`spdlog-1.4.2/...`); callers pass that directory as the
//! strip prefix so the source tree lands directly in the destination.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use zip::ZipArchive;

/// Errors raised during extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Local filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The filename does not carry a recognized archive extension.
    #[error("Unsupported archive format: {0}")]
    UnsupportedFormat(String),

    /// Malformed archive contents (including path traversal attempts).
    #[error("Archive error: {0}")]
    Archive(String),
}

/// Archive formats kiln can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Gzip-compressed tar archive (`.tar.gz` / `.tgz`).
    TarGz,
    /// Zip archive (`.zip`).
    Zip,
}

/// Detect the archive format from a filename.
///
/// # Errors
///
/// Returns [`ExtractError::UnsupportedFormat`] for unrecognized extensions.
pub fn detect_format(path: &Path) -> Result<ArchiveFormat, ExtractError> {
    let name = path.to_string_lossy().to_lowercase();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        Ok(ArchiveFormat::TarGz)
    } else if name.ends_with(".zip") {
        Ok(ArchiveFormat::Zip)
    } else {
        Err(ExtractError::UnsupportedFormat(name))
    }
}

/// Extract an archive, auto-detecting the format from the filename.
pub fn extract_auto(
    archive_path: &Path,
    dest_dir: &Path,
    strip_prefix: Option<&str>,
) -> Result<(), ExtractError> {
    match detect_format(archive_path)? {
        ArchiveFormat::TarGz => extract_tar_gz(archive_path, dest_dir, strip_prefix),
        ArchiveFormat::Zip => extract_zip(archive_path, dest_dir, strip_prefix),
    }
}

/// Extract a tar.gz archive to a destination directory.
pub fn extract_tar_gz(
    archive_path: &Path,
    dest_dir: &Path,
    strip_prefix: Option<&str>,
) -> Result<(), ExtractError> {
    let file = File::open(archive_path)?;
    let reader = BufReader::new(file);
    let gz_decoder = flate2::read::GzDecoder::new(reader);

    extract_tar(gz_decoder, dest_dir, strip_prefix)
}

fn extract_tar<R: Read>(
    reader: R,
    dest_dir: &Path,
    strip_prefix: Option<&str>,
) -> Result<(), ExtractError> {
    fs::create_dir_all(dest_dir)?;

    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path: PathBuf = entry.path()?.components().collect();

        if entry.header().entry_type().is_dir() {
            continue;
        }

        let Some(relative_path) = stripped(&entry_path, strip_prefix) else {
            continue;
        };

        let absolute_path = dest_dir.join(&relative_path);

        // Zip-slip guard: entries must stay inside the destination.
        if !absolute_path.starts_with(dest_dir) {
            return Err(ExtractError::Archive(format!(
                "Invalid path in archive: {}",
                entry_path.display()
            )));
        }

        if let Some(parent) = absolute_path.parent() {
            fs::create_dir_all(parent)?;
        }

        entry.unpack(&absolute_path)?;
    }

    Ok(())
}

/// Extract a zip archive to a destination directory.
pub fn extract_zip(
    archive_path: &Path,
    dest_dir: &Path,
    strip_prefix: Option<&str>,
) -> Result<(), ExtractError> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| ExtractError::Archive(e.to_string()))?;

    fs::create_dir_all(dest_dir)?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| ExtractError::Archive(e.to_string()))?;
        let Some(entry_path) = file.enclosed_name() else {
            continue;
        };

        if file.is_dir() {
            continue;
        }

        let Some(relative_path) = stripped(&entry_path, strip_prefix) else {
            continue;
        };

        let absolute_path = dest_dir.join(&relative_path);
        if let Some(parent) = absolute_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut outfile = File::create(&absolute_path)?;
        io::copy(&mut file, &mut outfile)?;

        #[cfg(unix)]
        if let Some(mode) = file.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&absolute_path, fs::Permissions::from_mode(mode))?;
        }
    }

    Ok(())
}

/// Strip the leading archive directory from an entry path.
///
/// Returns `None` for entries that *are* the prefix (nothing to extract).
/// Entries outside the prefix are kept unchanged; release archives are
/// expected to be uniform, but a stray top-level file should not vanish.
fn stripped(entry_path: &Path, strip_prefix: Option<&str>) -> Option<PathBuf> {
    let Some(prefix) = strip_prefix else {
        return Some(entry_path.to_path_buf());
    };

    let mut components = entry_path.components();
    match components.next() {
        Some(Component::Normal(first)) if first.to_string_lossy() == prefix => {
            let rest: PathBuf = components.collect();
            if rest.as_os_str().is_empty() {
                None
            } else {
                Some(rest)
            }
        }
        _ => Some(entry_path.to_path_buf()),
    }
}
