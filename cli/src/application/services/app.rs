//! Application container: descriptor, start-up and health.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, HostFs};
use crate::application::services::{COMPOSE_TIMEOUT, Host};
use crate::domain::{CertState, DeploymentConfig, Settings, render};

/// Unix mode for the descriptor, which embeds the basic-auth password.
const DESCRIPTOR_MODE: u32 = 0o600;

/// Render and write `docker-compose.yml` for `state`.
///
/// # Errors
///
/// Returns an error if rendering, writing or restricting permissions fails.
pub fn write_descriptor(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    config: &DeploymentConfig,
    settings: &Settings,
    state: CertState,
) -> Result<()> {
    let content = render::render_compose(config, settings, state)?;
    let path = settings.compose_path();
    host.fs.write(&path, &content)?;
    host.fs.set_permissions(&path, DESCRIPTOR_MODE)
}

/// `docker compose up -d`, then one fixed wait and one running check.
///
/// # Errors
///
/// Returns an error if compose fails or the container is not running after
/// `settings.start_wait_secs`. The message says where to find the logs.
pub async fn start(host: &Host<'_, impl CommandRunner, impl HostFs>, settings: &Settings) -> Result<()> {
    compose_up(host, settings, false).await?;
    wait_running(host, settings).await
}

/// Recreate the container so it picks up a rewritten descriptor.
///
/// # Errors
///
/// Same as [`start`].
pub async fn recreate(host: &Host<'_, impl CommandRunner, impl HostFs>, settings: &Settings) -> Result<()> {
    compose_up(host, settings, true).await?;
    wait_running(host, settings).await
}

async fn compose_up(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    settings: &Settings,
    force_recreate: bool,
) -> Result<()> {
    let compose = settings.compose_path().display().to_string();
    let mut args = vec!["compose", "-f", compose.as_str(), "up", "-d"];
    if force_recreate {
        args.push("--force-recreate");
    }
    host.exec_long("docker", &args, COMPOSE_TIMEOUT)
        .await
        .with_context(|| format!("starting containers; see: {}", logs_hint(settings)))?;
    Ok(())
}

async fn wait_running(host: &Host<'_, impl CommandRunner, impl HostFs>, settings: &Settings) -> Result<()> {
    tokio::time::sleep(Duration::from_secs(settings.start_wait_secs)).await;
    if is_running(host, settings).await {
        return Ok(());
    }
    anyhow::bail!(
        "container '{}' is not running after {}s; inspect logs with: {}",
        settings.container_name,
        settings.start_wait_secs,
        logs_hint(settings)
    )
}

/// Whether `docker inspect` reports the container as running.
pub async fn is_running(host: &Host<'_, impl CommandRunner, impl HostFs>, settings: &Settings) -> bool {
    host.query(
        "docker",
        &["inspect", "-f", "{{.State.Running}}", &settings.container_name],
    )
    .await
    .is_some_and(|s| s == "true")
}

/// Command that shows the application's logs.
#[must_use]
pub fn logs_hint(settings: &Settings) -> String {
    format!(
        "docker compose -f {} logs --tail 100",
        settings.compose_path().display()
    )
}
