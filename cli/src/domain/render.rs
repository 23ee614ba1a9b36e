//! Rendering of every generated file.
//!
//! Proxy site definitions are embedded templates with `{{name}}` placeholders;
//! the application descriptor is a typed compose document serialized with
//! `serde_yaml`. All functions are deterministic over
//! (`DeploymentConfig`, `Settings`, `CertState`).

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use include_dir::{Dir, include_dir};
use regex::Regex;
use serde::Serialize;

use crate::domain::certificate::{CertPaths, CertState};
use crate::domain::deployment::{DeploymentConfig, Settings};
use crate::domain::error::RenderError;

static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([a-z_]+)\s*\}\}").expect("valid placeholder regex"));

const PLAIN_TEMPLATE: &str = "nginx-plain.conf";
const TLS_TEMPLATE: &str = "nginx-tls.conf";

/// Path the application stores its state under inside the container.
const CONTAINER_DATA_DIR: &str = "/home/node/.n8n";
const SQLITE_POOL_SIZE: u8 = 5;

// ── Proxy site ───────────────────────────────────────────────────────────────

/// Which site definition to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyVariant {
    /// Port 80 only, proxying to the application.
    Plain,
    /// Port 80 redirecting to 443, which terminates TLS.
    Tls,
}

impl ProxyVariant {
    #[must_use]
    pub fn for_state(state: CertState) -> Self {
        match state {
            CertState::Issued(_) => Self::Tls,
            CertState::None | CertState::Failed => Self::Plain,
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::Plain => PLAIN_TEMPLATE,
            Self::Tls => TLS_TEMPLATE,
        }
    }
}

/// Render the nginx site definition.
///
/// # Errors
///
/// Returns an error if the template is missing or references a placeholder
/// that has no value.
pub fn render_proxy_site(
    config: &DeploymentConfig,
    settings: &Settings,
    variant: ProxyVariant,
) -> Result<String, RenderError> {
    let paths = CertPaths::for_domain(config.domain());
    let values = BTreeMap::from([
        ("domain", config.domain().to_string()),
        ("app_port", settings.app_port.to_string()),
        ("fullchain", paths.fullchain.display().to_string()),
        ("privkey", paths.privkey.display().to_string()),
    ]);
    render_template(variant.template(), &values)
}

fn render_template(
    name: &'static str,
    values: &BTreeMap<&str, String>,
) -> Result<String, RenderError> {
    let source = TEMPLATES
        .get_file(name)
        .and_then(|f| f.contents_utf8())
        .ok_or(RenderError::MissingTemplate(name))?;

    if let Some(unknown) = PLACEHOLDER_RE
        .captures_iter(source)
        .map(|c| c[1].to_string())
        .find(|key| !values.contains_key(key.as_str()))
    {
        return Err(RenderError::UnknownPlaceholder {
            template: name,
            placeholder: unknown,
        });
    }

    Ok(PLACEHOLDER_RE
        .replace_all(source, |c: &regex::Captures<'_>| {
            values.get(&c[1]).cloned().unwrap_or_default()
        })
        .into_owned())
}

// ── Application descriptor ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ComposeFile {
    services: BTreeMap<String, ComposeService>,
}

#[derive(Debug, Serialize)]
struct ComposeService {
    image: String,
    container_name: String,
    restart: &'static str,
    ports: Vec<String>,
    environment: Vec<String>,
    volumes: Vec<String>,
}

/// Environment for the application container, in a stable order.
#[must_use]
pub fn app_environment(
    config: &DeploymentConfig,
    settings: &Settings,
    state: CertState,
) -> Vec<(&'static str, String)> {
    let protocol = if state.tls_fronted() { "https" } else { "http" };
    let mut env = vec![
        ("N8N_BASIC_AUTH_ACTIVE", "true".to_string()),
        ("N8N_BASIC_AUTH_USER", config.admin_user().to_string()),
        (
            "N8N_BASIC_AUTH_PASSWORD",
            config.admin_password().expose().to_string(),
        ),
        ("N8N_HOST", config.domain().to_string()),
        ("N8N_PORT", settings.app_port.to_string()),
        ("N8N_PROTOCOL", protocol.to_string()),
        ("NODE_ENV", "production".to_string()),
        ("WEBHOOK_URL", format!("{protocol}://{}/", config.domain())),
        ("GENERIC_TIMEZONE", config.timezone().to_string()),
        ("TZ", config.timezone().to_string()),
        ("DB_SQLITE_POOL_SIZE", SQLITE_POOL_SIZE.to_string()),
        ("N8N_RUNNERS_ENABLED", "true".to_string()),
        ("N8N_ENFORCE_SETTINGS_FILE_PERMISSIONS", "true".to_string()),
        ("N8N_BLOCK_ENV_ACCESS_IN_NODE", "false".to_string()),
    ];
    if !state.tls_fronted() {
        env.push(("N8N_SECURE_COOKIE", "false".to_string()));
    }
    env
}

/// Host side of the port mapping: loopback-only behind TLS, every interface
/// in the plaintext fallback.
#[must_use]
pub fn port_binding(settings: &Settings, state: CertState) -> String {
    let port = settings.app_port;
    if state.tls_fronted() {
        format!("127.0.0.1:{port}:{port}")
    } else {
        format!("{port}:{port}")
    }
}

/// Render `docker-compose.yml` for the application.
///
/// # Errors
///
/// Returns an error if YAML serialization fails.
pub fn render_compose(
    config: &DeploymentConfig,
    settings: &Settings,
    state: CertState,
) -> Result<String, RenderError> {
    let service = ComposeService {
        image: settings.image.clone(),
        container_name: settings.container_name.clone(),
        restart: "unless-stopped",
        ports: vec![port_binding(settings, state)],
        environment: app_environment(config, settings, state)
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect(),
        volumes: vec![format!(
            "{}:{CONTAINER_DATA_DIR}",
            settings.data_dir().display()
        )],
    };
    let file = ComposeFile {
        services: BTreeMap::from([(settings.container_name.clone(), service)]),
    };
    Ok(serde_yaml::to_string(&file)?)
}

// ── Backup schedule ──────────────────────────────────────────────────────────

/// Render the `/etc/cron.d` entry that runs the backup routine daily.
#[must_use]
pub fn render_cron(settings: &Settings, exe: &Path) -> String {
    format!(
        "# Managed by n8n-provision. Daily backup of {data}.\n\
         SHELL=/bin/sh\n\
         PATH=/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin\n\
         0 {hour} * * * root {exe} backup --work-dir {work} --retention-days {days} >> /var/log/n8n-backup.log 2>&1\n",
        data = settings.data_dir().display(),
        hour = settings.backup_hour,
        exe = exe.display(),
        work = settings.work_dir.display(),
        days = settings.backup_retention_days,
    )
}

/// Directories a binary normally stays in once installed.
pub const STABLE_BIN_DIRS: &[&str] = &["/usr/local/bin", "/usr/bin"];

/// Whether a cron entry pointing at `exe` will still find it later. A binary
/// run from a build directory or `/tmp` may be gone by then.
#[must_use]
pub fn is_stable_exe(exe: &Path) -> bool {
    exe.parent()
        .is_some_and(|dir| STABLE_BIN_DIRS.iter().any(|d| dir == Path::new(d)))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
