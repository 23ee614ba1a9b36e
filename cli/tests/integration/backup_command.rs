//! Integration tests for `n8n-provision backup`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::cli_tests::n8n_provision;

#[test]
fn test_backup_creates_archive_under_work_dir() {
    let home = tempfile::tempdir().expect("tempdir");
    let work = home.path().join("n8n");
    std::fs::create_dir_all(work.join("n8n_data")).expect("mkdir");
    std::fs::write(work.join("n8n_data").join("database.sqlite"), b"SQLite format 3").expect("write");

    n8n_provision(home.path())
        .args(["--quiet", "backup", "--work-dir"])
        .arg(&work)
        .assert()
        .success();

    let archives: Vec<_> = std::fs::read_dir(work.join("backups"))
        .expect("backups dir")
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(archives.len(), 1, "{archives:?}");
    assert!(archives[0].starts_with("n8n-backup-") && archives[0].ends_with(".tar.gz"));
}

#[test]
fn test_backup_without_data_fails() {
    let home = tempfile::tempdir().expect("tempdir");
    n8n_provision(home.path())
        .args(["backup", "--work-dir"])
        .arg(home.path().join("missing"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}
