//! Deployment configuration: the validated, immutable operator input for one
//! run, plus the tool-level settings that shape the generated files.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ValidationError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_ADMIN_USER: &str = "admin";
pub const DEFAULT_TIMEZONE: &str = "Asia/Dhaka";

/// Directory nginx reads site definitions from.
pub const NGINX_SITES_AVAILABLE: &str = "/etc/nginx/sites-available";
/// Directory holding the symlinks of activated sites.
pub const NGINX_SITES_ENABLED: &str = "/etc/nginx/sites-enabled";
/// Cron drop-in directory.
pub const CRON_DIR: &str = "/etc/cron.d";

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)+$")
        .expect("valid hostname regex")
});

// ── Admin password ───────────────────────────────────────────────────────────

/// Basic-auth password for the application. Redacted in `Debug` output and
/// never serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminPassword(String);

impl AdminPassword {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminPassword(***)")
    }
}

// ── Raw input ────────────────────────────────────────────────────────────────

/// Unvalidated deployment values as gathered from flags, the answers file and
/// prompts. Every field is optional until [`DeploymentConfig::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDeployment {
    pub domain: Option<String>,
    pub public_ip: Option<String>,
    pub email: Option<String>,
    pub admin_user: Option<String>,
    #[serde(skip)]
    pub admin_password: Option<AdminPassword>,
    pub timezone: Option<String>,
}

impl RawDeployment {
    /// Fill every unset field of `self` from `other`.
    #[must_use]
    pub fn or(self, other: RawDeployment) -> RawDeployment {
        RawDeployment {
            domain: self.domain.or(other.domain),
            public_ip: self.public_ip.or(other.public_ip),
            email: self.email.or(other.email),
            admin_user: self.admin_user.or(other.admin_user),
            admin_password: self.admin_password.or(other.admin_password),
            timezone: self.timezone.or(other.timezone),
        }
    }
}

// ── Validated configuration ──────────────────────────────────────────────────

/// The complete operator-supplied values for one installation run.
///
/// Only constructed through [`DeploymentConfig::validate`], and never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    domain: String,
    public_ip: IpAddr,
    email: String,
    admin_user: String,
    admin_password: AdminPassword,
    timezone: String,
}

impl DeploymentConfig {
    /// Validate raw input. Checks run in a fixed order: domain, IP, email,
    /// password, so the first problem reported is deterministic.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn validate(raw: RawDeployment) -> Result<Self, ValidationError> {
        let domain = parse_domain(raw.domain.as_deref())?;
        let public_ip = parse_ip(raw.public_ip.as_deref())?;
        let email = parse_email(raw.email.as_deref())?;
        check_password(raw.admin_password.as_ref())?;
        let admin_password = raw.admin_password.ok_or(ValidationError::MissingPassword)?;

        let admin_user = non_blank_or(raw.admin_user, DEFAULT_ADMIN_USER);
        let timezone = non_blank_or(raw.timezone, DEFAULT_TIMEZONE);

        Ok(Self {
            domain,
            public_ip,
            email,
            admin_user,
            admin_password,
            timezone,
        })
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn public_ip(&self) -> IpAddr {
        self.public_ip
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn admin_user(&self) -> &str {
        &self.admin_user
    }

    #[must_use]
    pub fn admin_password(&self) -> &AdminPassword {
        &self.admin_password
    }

    #[must_use]
    pub fn timezone(&self) -> &str {
        &self.timezone
    }
}

/// Trimmed, lowercased domain, checked with [`validate_domain`].
///
/// # Errors
///
/// Missing, empty or malformed domain.
pub fn parse_domain(value: Option<&str>) -> Result<String, ValidationError> {
    let domain = required(value, "Domain name", "domain")?.to_ascii_lowercase();
    validate_domain(&domain)?;
    Ok(domain)
}

/// Trimmed public IP, parsed.
///
/// # Errors
///
/// Missing, empty or unparsable address.
pub fn parse_ip(value: Option<&str>) -> Result<IpAddr, ValidationError> {
    let text = required(value, "Public IP", "ip")?;
    text.parse::<IpAddr>()
        .map_err(|_| ValidationError::InvalidIp(text.clone()))
}

/// Trimmed notification email, checked with [`validate_email`].
///
/// # Errors
///
/// Missing, empty or malformed address.
pub fn parse_email(value: Option<&str>) -> Result<String, ValidationError> {
    let email = required(value, "Notification email", "email")?;
    validate_email(&email)?;
    Ok(email)
}

/// A password must be present and non-empty.
///
/// # Errors
///
/// [`ValidationError::MissingPassword`] when absent, `Empty` when blank.
pub fn check_password(value: Option<&AdminPassword>) -> Result<(), ValidationError> {
    match value {
        Some(p) if p.expose().is_empty() => Err(ValidationError::Empty {
            field: "Admin password",
        }),
        Some(_) => Ok(()),
        None => Err(ValidationError::MissingPassword),
    }
}

fn required(
    value: Option<&str>,
    field: &'static str,
    flag: &'static str,
) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some("") => Err(ValidationError::Empty { field }),
        Some(v) => Ok(v.to_string()),
        None => Err(ValidationError::Missing { field, flag }),
    }
}

fn non_blank_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates that `domain` is a bare, fully-qualified hostname.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDomain`] for schemes, paths, ports or
/// malformed labels.
pub fn validate_domain(domain: &str) -> Result<(), ValidationError> {
    if domain.len() > 253 || !HOSTNAME_RE.is_match(domain) {
        return Err(ValidationError::InvalidDomain(domain.to_string()));
    }
    Ok(())
}

/// Validates the shape of a notification email address.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEmail`] unless there is exactly one `@`
/// with a non-empty local part and a dotted domain part.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(email.to_string());
    let (local, host) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || host.contains('@') || email.contains(char::is_whitespace) {
        return Err(invalid());
    }
    validate_domain(&host.to_ascii_lowercase()).map_err(|_| invalid())
}

// ── Settings ─────────────────────────────────────────────────────────────────

/// Tool-level knobs. Defaults reproduce the standard single-node layout; the
/// answers file may override any of them under `settings:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the compose file, data and backups.
    pub work_dir: PathBuf,
    /// Port the application listens on inside and outside the container.
    pub app_port: u16,
    /// Container image for the application.
    pub image: String,
    /// Container name, used for `docker inspect`.
    pub container_name: String,
    /// Name of the nginx site file.
    pub site_name: String,
    /// Hour of day (0-23) the backup job runs.
    pub backup_hour: u8,
    /// Archives older than this many days are pruned.
    pub backup_retention_days: u32,
    /// Seconds to wait after `docker compose up` before checking the container.
    pub start_wait_secs: u64,
    /// Pass `--keep-until-expiring` to certbot so a valid certificate is reused.
    pub reuse_certificate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/opt/n8n"),
            app_port: 5678,
            image: "docker.n8n.io/n8nio/n8n:latest".to_string(),
            container_name: "n8n".to_string(),
            site_name: "n8n".to_string(),
            backup_hour: 2,
            backup_retention_days: 7,
            start_wait_secs: 15,
            reuse_certificate: false,
        }
    }
}

impl Settings {
    /// Validates numeric ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error if `backup_hour` is not a valid hour.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backup_hour > 23 {
            return Err(ValidationError::InvalidBackupHour(self.backup_hour));
        }
        Ok(())
    }

    #[must_use]
    pub fn compose_path(&self) -> PathBuf {
        self.work_dir.join("docker-compose.yml")
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.work_dir.join("n8n_data")
    }

    #[must_use]
    pub fn backup_dir(&self) -> PathBuf {
        self.work_dir.join("backups")
    }

    #[must_use]
    pub fn site_available(&self) -> PathBuf {
        Path::new(NGINX_SITES_AVAILABLE).join(&self.site_name)
    }

    #[must_use]
    pub fn site_enabled(&self) -> PathBuf {
        Path::new(NGINX_SITES_ENABLED).join(&self.site_name)
    }

    #[must_use]
    pub fn cron_path(&self) -> PathBuf {
        Path::new(CRON_DIR).join(format!("{}-backup", self.site_name))
    }
}

/// Shape of the optional YAML answers file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnswersFile {
    #[serde(flatten)]
    pub deployment: RawDeployment,
    pub settings: Settings,
}

// ── Unit tests ───────────────────────────────────────────────────────────────
