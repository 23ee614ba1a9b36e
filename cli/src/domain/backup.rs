//! Backup archive naming and retention.

use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};

pub const ARCHIVE_PREFIX: &str = "n8n-backup-";
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// File name for an archive taken at `when`.
#[must_use]
pub fn archive_name(when: DateTime<Local>) -> String {
    format!("{ARCHIVE_PREFIX}{}{ARCHIVE_SUFFIX}", when.format("%Y%m%d-%H%M%S"))
}

/// Whether `name` is an archive this tool produced. Anything else in the
/// backup directory is left alone by pruning.
#[must_use]
pub fn is_backup_archive(name: &str) -> bool {
    name.len() > ARCHIVE_PREFIX.len() + ARCHIVE_SUFFIX.len()
        && name.starts_with(ARCHIVE_PREFIX)
        && name.ends_with(ARCHIVE_SUFFIX)
}

/// Whether an archive last modified at `modified` is past retention at `now`.
#[must_use]
pub fn is_expired(modified: SystemTime, now: SystemTime, retention_days: u32) -> bool {
    let window = Duration::from_secs(u64::from(retention_days) * 24 * 60 * 60);
    now.duration_since(modified).is_ok_and(|age| age > window)
}
