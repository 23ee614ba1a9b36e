//! Host preparation stages: privileges, packages, Docker, firewall and the
//! working directory. Every stage is safe to run again on a prepared host.

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, HostFs, ProgressReporter};
use crate::application::services::{Host, INSTALL_TIMEOUT};
use crate::domain::Settings;
use crate::domain::firewall::{self, REQUIRED_RULES};
use crate::domain::stage::Outcome;

/// Packages installed from the distribution archive.
pub const SYSTEM_PACKAGES: &[&str] = &[
    "ca-certificates",
    "curl",
    "nginx",
    "certbot",
    "python3-certbot-nginx",
    "ufw",
    "cron",
];

const DOCKER_SCRIPT_URL: &str = "https://get.docker.com";
const DOCKER_SCRIPT_PATH: &str = "/tmp/get-docker.sh";
/// UID/GID of the `node` user inside the application image.
const APP_UID_GID: &str = "1000:1000";

/// Require an effective UID of 0.
///
/// # Errors
///
/// Returns an error if `id -u` fails or reports a non-root user.
pub async fn verify_root(host: &Host<'_, impl CommandRunner, impl HostFs>) -> Result<Outcome> {
    let output = host.exec("id", &["-u"]).await?;
    let uid = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if uid != "0" {
        anyhow::bail!("must run as root (current uid {uid}); retry with sudo");
    }
    Ok(Outcome::Succeeded)
}

/// Refresh the package index, upgrade, and install [`SYSTEM_PACKAGES`].
///
/// # Errors
///
/// Returns an error if any apt-get invocation fails.
pub async fn install_packages(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    reporter: &impl ProgressReporter,
) -> Result<Outcome> {
    reporter.step("refreshing package index...");
    apt_get(host, &["update"]).await?;
    reporter.step("upgrading installed packages...");
    apt_get(host, &["upgrade", "-y"]).await?;
    reporter.step(&format!("installing {}...", SYSTEM_PACKAGES.join(", ")));
    let mut args = vec!["install", "-y"];
    args.extend_from_slice(SYSTEM_PACKAGES);
    apt_get(host, &args).await?;
    Ok(Outcome::Succeeded)
}

async fn apt_get(host: &Host<'_, impl CommandRunner, impl HostFs>, args: &[&str]) -> Result<()> {
    let mut full = vec!["DEBIAN_FRONTEND=noninteractive", "apt-get"];
    full.extend_from_slice(args);
    host.exec_long("env", &full, INSTALL_TIMEOUT).await?;
    Ok(())
}

/// Install Docker Engine through the upstream convenience script if absent.
///
/// # Errors
///
/// Returns an error if download, installation or service enablement fails.
pub async fn ensure_docker(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    reporter: &impl ProgressReporter,
) -> Result<Outcome> {
    if let Some(version) = host.query("docker", &["--version"]).await {
        reporter.info(&format!("Docker already installed ({version})"));
        return Ok(Outcome::Succeeded);
    }
    reporter.step("installing Docker Engine...");
    host.exec_long(
        "curl",
        &["-fsSL", DOCKER_SCRIPT_URL, "-o", DOCKER_SCRIPT_PATH],
        INSTALL_TIMEOUT,
    )
    .await
    .context("downloading the Docker install script")?;
    host.exec_long("sh", &[DOCKER_SCRIPT_PATH], INSTALL_TIMEOUT)
        .await
        .context("running the Docker install script")?;
    host.fs.remove_file(std::path::Path::new(DOCKER_SCRIPT_PATH))?;
    host.exec("systemctl", &["enable", "--now", "docker"]).await?;
    Ok(Outcome::Succeeded)
}

/// Install the `docker compose` plugin if absent.
///
/// # Errors
///
/// Returns an error if the plugin package cannot be installed.
pub async fn ensure_compose_plugin(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    reporter: &impl ProgressReporter,
) -> Result<Outcome> {
    if let Some(version) = host.query("docker", &["compose", "version"]).await {
        reporter.info(&format!("Compose plugin already installed ({version})"));
        return Ok(Outcome::Succeeded);
    }
    reporter.step("installing docker-compose-plugin...");
    apt_get(host, &["install", "-y", "docker-compose-plugin"]).await?;
    Ok(Outcome::Succeeded)
}

/// Allow SSH, HTTP and HTTPS, then enable ufw. Rules already present are
/// not re-added.
///
/// # Errors
///
/// Returns an error if ufw cannot be queried or changed.
pub async fn configure_firewall(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    reporter: &impl ProgressReporter,
) -> Result<Outcome> {
    let output = host.exec("ufw", &["status"]).await?;
    let status = String::from_utf8_lossy(&output.stdout);

    let missing = firewall::missing_rules(&status, REQUIRED_RULES);
    for rule in &missing {
        host.exec("ufw", &["allow", *rule]).await?;
    }
    if missing.is_empty() {
        reporter.info("firewall rules already present");
    }

    if !firewall::is_active(&status) {
        host.exec("ufw", &["--force", "enable"]).await?;
    }
    Ok(Outcome::Succeeded)
}

/// Create the working, data and backup directories and hand the data
/// directory to the container user.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or chowned.
pub async fn prepare_work_dir(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    settings: &Settings,
) -> Result<Outcome> {
    for dir in [settings.work_dir.clone(), settings.data_dir(), settings.backup_dir()] {
        host.fs.create_dir_all(&dir)?;
    }
    let data = settings.data_dir().display().to_string();
    host.exec("chown", &["-R", APP_UID_GID, &data]).await?;
    Ok(Outcome::Succeeded)
}
