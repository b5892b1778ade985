//! Archive extraction
//!
//! Extraction of the two archive families the pipeline downloads or produces:
//! gzip-compressed tarballs (the Unix formatter distribution) and zip archives
//! (the Maven distribution, the win32 formatter, and the mapped server jar).
//! Entries that would escape the destination directory are rejected.

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Extract a `.tar.gz` archive into `dest`.
pub fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    debug!(archive = %archive.display(), dest = %dest.display(), "Extracting tar.gz");

    let data = fs::read(archive)
        .with_context(|| format!("Failed to read archive {}", archive.display()))?;

    let mut decoder = flate2::read::MultiGzDecoder::new(&data[..]);
    let mut tar_data = Vec::new();
    decoder
        .read_to_end(&mut tar_data)
        .with_context(|| format!("Failed to decompress {} (invalid gzip)", archive.display()))?;

    fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;

    // tar::Archive::unpack refuses entries that escape the destination.
    let mut tar = tar::Archive::new(&tar_data[..]);
    tar.unpack(dest)
        .with_context(|| format!("Failed to unpack {} into {}", archive.display(), dest.display()))?;

    Ok(())
}

/// Extract a zip archive into `dest`.
///
/// When `filter` is given, only entries whose name starts with that prefix
/// are extracted (used to pull the server class files out of the mapped jar).
pub fn extract_zip(archive: &Path, dest: &Path, filter: Option<&str>) -> Result<()> {
    debug!(archive = %archive.display(), dest = %dest.display(), "Extracting zip");

    let file = fs::File::open(archive)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file)
        .with_context(|| format!("Failed to read zip archive {}", archive.display()))?;

    fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .with_context(|| format!("Failed to read entry {} of {}", i, archive.display()))?;

        if let Some(prefix) = filter {
            if !entry.name().starts_with(prefix) {
                continue;
            }
        }

        let rel = match entry.enclosed_name() {
            Some(rel) => rel,
            None => anyhow::bail!(
                "Archive entry escapes the destination: {} in {}",
                entry.name(),
                archive.display()
            ),
        };
        let out = dest.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            continue;
        }

        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut target = fs::File::create(&out)
            .with_context(|| format!("Failed to create {}", out.display()))?;
        std::io::copy(&mut entry, &mut target)
            .with_context(|| format!("Failed to extract {}", out.display()))?;
    }

    Ok(())
}
