//! Integration tests for `n8n-provision render`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::cli_tests::n8n_provision;

const IDENTITY: [&str; 8] = [
    "--domain",
    "n8n.example.com",
    "--ip",
    "203.0.113.10",
    "--email",
    "ops@example.com",
    "--timezone",
    "UTC",
];

#[test]
fn test_render_prints_all_files_for_tls() {
    let home = tempfile::tempdir().expect("tempdir");
    n8n_provision(home.path())
        .args(["-y", "render", "--state", "integrated"])
        .args(IDENTITY)
        .env("N8N_ADMIN_PASSWORD", "s3cret-pass")
        .assert()
        .success()
        .stdout(predicate::str::contains("docker-compose.yml"))
        .stdout(predicate::str::contains("N8N_PROTOCOL=https"))
        .stdout(predicate::str::contains("127.0.0.1:5678:5678"))
        .stdout(predicate::str::contains("listen 443 ssl http2;"))
        .stdout(predicate::str::contains("backup --work-dir /opt/n8n"));
}

#[test]
fn test_render_failed_state_is_plaintext() {
    let home = tempfile::tempdir().expect("tempdir");
    n8n_provision(home.path())
        .args(["-y", "render", "--state", "failed"])
        .args(IDENTITY)
        .env("N8N_ADMIN_PASSWORD", "s3cret-pass")
        .assert()
        .success()
        .stdout(predicate::str::contains("N8N_PROTOCOL=http"))
        .stdout(predicate::str::contains("N8N_SECURE_COOKIE=false"))
        .stdout(predicate::str::contains("ssl_certificate").not());
}

#[test]
fn test_render_writes_into_out_dir() {
    let home = tempfile::tempdir().expect("tempdir");
    let out = home.path().join("out");
    n8n_provision(home.path())
        .args(["-y", "--quiet", "render", "--out-dir"])
        .arg(&out)
        .args(IDENTITY)
        .env("N8N_ADMIN_PASSWORD", "s3cret-pass")
        .assert()
        .success();

    let compose = std::fs::read_to_string(out.join("docker-compose.yml")).expect("compose");
    assert!(compose.contains("N8N_BASIC_AUTH_PASSWORD=s3cret-pass"));
    assert!(out.join("n8n.conf").is_file());
    assert!(out.join("n8n-backup").is_file());
}

#[test]
fn test_render_reads_answers_file_and_flags_win() {
    let home = tempfile::tempdir().expect("tempdir");
    let answers = home.path().join("answers.yaml");
    std::fs::write(
        &answers,
        "domain: from-file.example.com\npublic_ip: 203.0.113.10\nemail: ops@example.com\n\
         settings:\n  app_port: 15678\n  site_name: automation\n",
    )
    .expect("write answers");
    let out = home.path().join("out");

    n8n_provision(home.path())
        .args(["-y", "--quiet", "render", "--domain", "flag.example.com", "--out-dir"])
        .arg(&out)
        .arg("--config")
        .arg(&answers)
        .env("N8N_ADMIN_PASSWORD", "s3cret-pass")
        .assert()
        .success();

    let site = std::fs::read_to_string(out.join("automation.conf")).expect("site");
    assert!(site.contains("server_name flag.example.com;"));
    assert!(site.contains("proxy_pass http://127.0.0.1:15678;"));
}

#[test]
fn test_render_rejects_empty_domain() {
    let home = tempfile::tempdir().expect("tempdir");
    n8n_provision(home.path())
        .args(["-y", "render", "--domain", "", "--ip", "203.0.113.10", "--email", "ops@example.com"])
        .env("N8N_ADMIN_PASSWORD", "s3cret-pass")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Domain name is required and cannot be empty"));
}

#[test]
fn test_render_rejects_unknown_state() {
    let home = tempfile::tempdir().expect("tempdir");
    n8n_provision(home.path())
        .args(["render", "--state", "bogus"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value 'bogus'"));
}
