//! Unit tests for the backup routine against the real tar.gz store.

#![allow(clippy::expect_used)]

use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};

use chrono::{Local, TimeZone};

use n8n_provision::application::services::backup;
use n8n_provision::infra::backup::TarGzStore;

use crate::mocks::RecordingReporter;

const DAY: Duration = Duration::from_secs(86_400);

fn age(path: &Path, by: Duration) {
    let file = File::options().write(true).open(path).expect("open");
    file.set_modified(SystemTime::now() - by).expect("set mtime");
}

fn seed_data(work: &Path) {
    let data = work.join("n8n_data");
    std::fs::create_dir_all(&data).expect("mkdir");
    std::fs::write(data.join("database.sqlite"), b"SQLite format 3").expect("write");
}

#[test]
fn test_backup_writes_timestamped_archive() {
    let work = tempfile::tempdir().expect("tempdir");
    seed_data(work.path());
    let backups = work.path().join("backups");
    let now = Local.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).single().expect("valid time");

    let report = backup::run(
        &TarGzStore,
        &RecordingReporter::new(),
        &work.path().join("n8n_data"),
        &backups,
        7,
        now,
    )
    .expect("backup");

    assert_eq!(report.archive, backups.join("n8n-backup-20260301-020000.tar.gz"));
    assert!(report.archive.is_file());
    assert!(report.bytes > 0);
    assert!(report.pruned.is_empty());
}

#[test]
fn test_backup_prunes_only_expired_own_archives() {
    let work = tempfile::tempdir().expect("tempdir");
    seed_data(work.path());
    let backups = work.path().join("backups");
    std::fs::create_dir_all(&backups).expect("mkdir");

    let old = backups.join("n8n-backup-20250101-020000.tar.gz");
    let recent = backups.join("n8n-backup-20250110-020000.tar.gz");
    let foreign = backups.join("notes.txt");
    for path in [&old, &recent, &foreign] {
        std::fs::write(path, b"x").expect("write");
    }
    age(&old, DAY * 8);
    age(&recent, DAY * 6);
    age(&foreign, DAY * 30);

    let report = backup::run(
        &TarGzStore,
        &RecordingReporter::new(),
        &work.path().join("n8n_data"),
        &backups,
        7,
        Local::now(),
    )
    .expect("backup");

    assert_eq!(report.pruned, vec![old.clone()]);
    assert!(!old.exists());
    assert!(recent.exists());
    assert!(foreign.exists(), "files this tool did not write are kept");
    assert!(report.archive.exists());
}

#[test]
fn test_backup_without_data_directory_fails() {
    let work = tempfile::tempdir().expect("tempdir");
    let err = backup::run(
        &TarGzStore,
        &RecordingReporter::new(),
        &work.path().join("n8n_data"),
        &work.path().join("backups"),
        7,
        Local::now(),
    )
    .expect_err("no data");
    assert!(format!("{err:#}").contains("does not exist"), "{err:#}");
}
