//! Remote file downloads

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Download `url` into `dest`, creating parent directories as needed.
///
/// Fails on non-success HTTP statuses and on empty bodies; a zero-byte
/// download would otherwise satisfy the existence checks downstream and
/// poison every later stage.
pub async fn download(url: &str, dest: &Path) -> Result<()> {
    info!(url, dest = %dest.display(), "Starting download");

    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to download {} (check network connectivity)", url))?;

    if !response.status().is_success() {
        anyhow::bail!(
            "Download failed with HTTP {} from {}",
            response.status(),
            url
        );
    }

    let bytes = response
        .bytes()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))?;

    if bytes.is_empty() {
        anyhow::bail!("Downloaded file is empty (HTTP 200 but 0 bytes) from {}", url);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(dest, &bytes).with_context(|| format!("Failed to write {}", dest.display()))?;

    info!(url, bytes = bytes.len(), "Finished download");
    Ok(())
}
