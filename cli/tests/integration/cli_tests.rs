//! Integration tests for the CLI surface: help, version and input validation.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

/// The binary with a clean environment: no colors, no answers file, no
/// inherited password or CI flag.
pub fn n8n_provision(home: &std::path::Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("n8n-provision"));
    cmd.env("NO_COLOR", "1")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("CI")
        .env_remove("N8N_PROVISION_YES")
        .env_remove("N8N_PROVISION_CONFIG")
        .env_remove("N8N_ADMIN_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn home() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help() {
    let home = home();
    n8n_provision(home.path())
        .env_remove("NO_COLOR")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Provision n8n behind nginx"));
}

#[test]
fn test_cli_no_args_with_no_color_asks_for_subcommand() {
    let home = home();
    n8n_provision(home.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_no_color_accepts_conventional_values() {
    let home = home();
    for value in ["1", "yes", "", "0"] {
        n8n_provision(home.path())
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("n8n-provision 0.1.0"));
    }
}

#[test]
fn test_cli_help_lists_commands() {
    let home = home();
    let output = n8n_provision(home.path())
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let help = String::from_utf8_lossy(&output);
    for command in ["install", "render", "backup", "status", "version"] {
        assert!(help.contains(command), "{command} missing from help:\n{help}");
    }
}

#[test]
fn test_cli_version_flag_shows_version() {
    let home = home();
    n8n_provision(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("n8n-provision"));
}

#[test]
fn test_version_command_shows_version() {
    let home = home();
    n8n_provision(home.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("n8n-provision 0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let home = home();
    let output = n8n_provision(home.path())
        .args(["version", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(value["version"], "0.1.0");
}

#[test]
fn test_install_help_shows_flags() {
    let home = home();
    n8n_provision(home.path())
        .args(["install", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--domain"))
        .stdout(predicate::str::contains("--ip"))
        .stdout(predicate::str::contains("--skip-dns-check"))
        .stdout(predicate::str::contains("--reuse-certificate"));
}

// --- Validation happens before any host change ---

#[test]
fn test_install_rejects_invalid_email_before_changes() {
    let home = home();
    n8n_provision(home.path())
        .args([
            "-y",
            "install",
            "--domain",
            "n8n.example.com",
            "--ip",
            "203.0.113.10",
            "--email",
            "not-an-email",
        ])
        .env("N8N_ADMIN_PASSWORD", "s3cret-pass")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid email address 'not-an-email'"));
}

#[test]
fn test_install_non_interactive_missing_domain_names_flag() {
    let home = home();
    n8n_provision(home.path())
        .args(["--yes", "install", "--ip", "203.0.113.10"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pass --domain"));
}

#[test]
fn test_install_ci_env_is_non_interactive() {
    let home = home();
    n8n_provision(home.path())
        .args([
            "install",
            "--domain",
            "n8n.example.com",
            "--ip",
            "203.0.113.10",
            "--email",
            "ops@example.com",
        ])
        .env("CI", "true")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("N8N_ADMIN_PASSWORD"));
}

#[test]
fn test_install_missing_answers_file_is_an_error() {
    let home = home();
    n8n_provision(home.path())
        .args(["-y", "install", "--config"])
        .arg(home.path().join("absent.yaml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn test_status_without_domain_fails() {
    let home = home();
    n8n_provision(home.path())
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pass --domain"));
}

#[test]
fn test_status_json_without_domain_prints_error_object() {
    let home = home();
    let output = n8n_provision(home.path())
        .args(["status", "--json"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "invalid_input");
    assert!(
        value["message"]
            .as_str()
            .is_some_and(|m| m.contains("--domain")),
        "{value}"
    );
}

#[test]
fn test_status_json_unreadable_config_reports_config_error() {
    let home = home();
    let output = n8n_provision(home.path())
        .args(["status", "--json", "--config"])
        .arg(home.path().join("absent.yaml"))
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(value["code"], "config_error");
}
