//! Fetch-and-extract: turn a [`SourceArchive`] declaration into a source tree.

use std::io::Read;
use std::path::Path;

use reqwest::Client;
use sha2::{Digest, Sha256};

use kiln_schema::SourceArchive;

use crate::error::RecipeError;
use crate::io::{download, extract};

/// SHA-256 digest of a file on disk, lowercase hex.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Download (or reuse from cache), verify, and extract a source archive.
///
/// The archive lands in `cache_dir` keyed by its digest, so repeated runs
/// of the same recipe version never re-download. The source folder is
/// recreated from scratch on every call; recipes may patch their source
/// tree during build and a stale tree must not leak into the next run.
pub async fn fetch_source(
    client: &Client,
    archive: &SourceArchive,
    url: &str,
    cache_dir: &Path,
    source_folder: &Path,
) -> Result<(), RecipeError> {
    archive.validate()?;

    std::fs::create_dir_all(cache_dir)?;
    let cached = cache_dir.join(format!("{}-{}", &archive.sha256[..12], archive.filename()));

    let reusable = cached.exists() && sha256_file(&cached)? == archive.sha256;
    if reusable {
        tracing::debug!(path = %cached.display(), "reusing cached archive");
    } else {
        tracing::info!(url, "fetching source archive");
        download::download_and_verify(client, url, &cached, &archive.sha256).await?;
    }

    if source_folder.exists() {
        std::fs::remove_dir_all(source_folder)?;
    }
    extract::extract_auto(&cached, source_folder, archive.strip_prefix.as_deref())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn make_tar_gz_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, path, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[tokio::test]
    async fn test_fetch_downloads_then_reuses_cache() {
        let body = make_tar_gz_bytes(&[("demo-1.0/CMakeLists.txt", "project(demo)")]);
        let digest = hex::encode(Sha256::digest(&body));

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/demo-1.0.tar.gz")
            .with_status(200)
            .with_body(&body)
            .expect(1)
            .create_async()
            .await;

        let home = tempfile::tempdir().unwrap();
        let cache_dir = home.path().join("cache");
        let source_folder = home.path().join("src/demo/1.0");
        let url = format!("{}/demo-1.0.tar.gz", server.url());
        let archive = SourceArchive::new(&url, &digest, "demo-1.0");

        let client = Client::new();
        fetch_source(&client, &archive, &url, &cache_dir, &source_folder)
            .await
            .unwrap();
        assert!(source_folder.join("CMakeLists.txt").exists());

        // Second fetch must hit the cache, not the server (expect(1) above).
        std::fs::remove_dir_all(&source_folder).unwrap();
        fetch_source(&client, &archive, &url, &cache_dir, &source_folder)
            .await
            .unwrap();
        assert!(source_folder.join("CMakeLists.txt").exists());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_declaration() {
        let client = Client::new();
        let home = tempfile::tempdir().unwrap();
        let archive = SourceArchive::new("https://example.com/a.tar.gz", "tooshort", "a");

        let err = fetch_source(
            &client,
            &archive,
            &archive.url.clone(),
            &home.path().join("cache"),
            &home.path().join("src"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RecipeError::Source(_)));
    }
}
