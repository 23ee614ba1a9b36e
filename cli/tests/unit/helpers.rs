//! Shared test helpers: output constructors and deployment fixtures.

#![allow(dead_code)]

use std::process::{ExitStatus, Output};

use n8n_provision::domain::{AdminPassword, DeploymentConfig, RawDeployment, Settings};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Deployment fixtures ──────────────────────────────────────────────────────

pub const DOMAIN: &str = "n8n.example.com";
pub const PUBLIC_IP: &str = "203.0.113.10";

pub fn raw() -> RawDeployment {
    RawDeployment {
        domain: Some(DOMAIN.to_string()),
        public_ip: Some(PUBLIC_IP.to_string()),
        email: Some("ops@example.com".to_string()),
        admin_user: Some("admin".to_string()),
        admin_password: Some(AdminPassword::new("s3cret-pass")),
        timezone: Some("UTC".to_string()),
    }
}

pub fn config() -> DeploymentConfig {
    DeploymentConfig::validate(raw()).expect("fixture is valid")
}

/// Default settings without the container start-up wait.
pub fn settings() -> Settings {
    Settings {
        start_wait_secs: 0,
        ..Settings::default()
    }
}
