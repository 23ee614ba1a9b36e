//! The backup routine run by the scheduled job.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::application::ports::{BackupStore, ProgressReporter};
use crate::domain::backup::{archive_name, is_backup_archive, is_expired};

/// What one backup run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    pub archive: PathBuf,
    pub bytes: u64,
    pub pruned: Vec<PathBuf>,
}

/// Archive `data_dir` into `backup_dir`, then prune archives older than
/// `retention_days`. The archive just written is never pruned.
///
/// # Errors
///
/// Returns an error if the data directory is missing or the archive cannot
/// be written. Failure to remove an old archive is reported and skipped.
pub fn run(
    store: &impl BackupStore,
    reporter: &impl ProgressReporter,
    data_dir: &Path,
    backup_dir: &Path,
    retention_days: u32,
    now: DateTime<Local>,
) -> Result<BackupReport> {
    let archive = backup_dir.join(archive_name(now));
    reporter.step(&format!("archiving {}...", data_dir.display()));
    let bytes = store
        .create_archive(data_dir, &archive)
        .with_context(|| format!("archiving {} to {}", data_dir.display(), archive.display()))?;
    reporter.success(&format!("wrote {} ({bytes} bytes)", archive.display()));

    let now_sys: SystemTime = now.into();
    let mut pruned = Vec::new();
    for entry in store.list(backup_dir)? {
        let is_ours = entry
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_backup_archive);
        if !is_ours || entry.path == archive || !is_expired(entry.modified, now_sys, retention_days) {
            continue;
        }
        match store.remove(&entry.path) {
            Ok(()) => pruned.push(entry.path),
            Err(e) => reporter.warn(&format!("could not prune {}: {e:#}", entry.path.display())),
        }
    }
    if !pruned.is_empty() {
        reporter.info(&format!("pruned {} archive(s) older than {retention_days} days", pruned.len()));
    }

    Ok(BackupReport {
        archive,
        bytes,
        pruned,
    })
}
