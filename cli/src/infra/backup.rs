//! Backup infrastructure — implements `BackupStore` with `tar` + `flate2`.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;

use crate::application::ports::{ArchiveEntry, BackupStore};

/// Writes `.tar.gz` archives to the local filesystem.
pub struct TarGzStore;

impl BackupStore for TarGzStore {
    fn create_archive(&self, source: &Path, dest: &Path) -> Result<u64> {
        if !source.is_dir() {
            anyhow::bail!("data directory {} does not exist", source.display());
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        write_or_discard(dest, |file| {
            let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
            builder.follow_symlinks(false);

            let root = source
                .file_name()
                .map_or_else(|| "data".into(), |n| n.to_os_string());
            builder
                .append_dir_all(&root, source)
                .with_context(|| format!("adding {} to archive", source.display()))?;
            builder
                .into_inner()
                .context("finishing tar stream")?
                .finish()
                .context("finishing gzip stream")?;
            Ok(())
        })?;

        let bytes = std::fs::metadata(dest)
            .with_context(|| format!("reading {}", dest.display()))?
            .len();
        Ok(bytes)
    }

    fn list(&self, dir: &Path) -> Result<Vec<ArchiveEntry>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
            let entry = entry.context("reading dir entry")?;
            let meta = entry.metadata().context("reading entry metadata")?;
            if meta.is_file() {
                entries.push(ArchiveEntry {
                    path: entry.path(),
                    modified: meta.modified().context("reading modification time")?,
                });
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).with_context(|| format!("removing {}", path.display()))
    }
}

/// Create `dest` and hand it to `fill`. If `fill` fails the file is removed,
/// so a half-written archive never sits next to the good ones.
fn write_or_discard(dest: &Path, fill: impl FnOnce(File) -> Result<()>) -> Result<()> {
    let file = File::create(dest).with_context(|| format!("creating {}", dest.display()))?;
    fill(file).inspect_err(|_| {
        if let Err(e) = std::fs::remove_file(dest) {
            tracing::warn!(path = %dest.display(), error = %e, "cannot remove partial archive");
        }
    })
}
