//! Async download with streaming SHA-256 verification.

use std::path::Path;

use futures::StreamExt;
use reqwest::Client;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Errors raised while downloading a source archive.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP-level failure (connect error, non-2xx status, broken stream).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local filesystem failure while writing the archive.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The downloaded bytes do not match the declared digest.
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch {
        /// Digest declared by the recipe.
        expected: String,
        /// Digest of the bytes actually received.
        actual: String,
    },
}

/// Download `url` to `dest`, verifying the SHA-256 digest as bytes stream in.
///
/// On digest mismatch the partial file is deleted before the error is
/// returned, so a later retry starts clean. Returns the verified digest.
pub async fn download_and_verify(
    client: &Client,
    url: &str,
    dest: &Path,
    expected_hash: &str,
) -> Result<String, DownloadError> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await?
        .error_for_status()?;

    let total_size = response.content_length().unwrap_or(0);
    tracing::debug!(url, total_size, "starting download");

    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut hasher = Sha256::new();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        hasher.update(&chunk);
        downloaded += chunk.len() as u64;
    }

    file.flush().await?;
    let actual_hash = hex::encode(hasher.finalize());

    if actual_hash != expected_hash {
        tokio::fs::remove_file(dest).await.ok();
        return Err(DownloadError::HashMismatch {
            expected: expected_hash.to_string(),
            actual: actual_hash,
        });
    }

    tracing::debug!(url, downloaded, "download verified");
    Ok(actual_hash)
}
