//! nginx site management.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, HostFs};
use crate::application::services::Host;
use crate::domain::deployment::NGINX_SITES_ENABLED;
use crate::domain::render::{self, ProxyVariant};
use crate::domain::{DeploymentConfig, Settings};

/// Write the site definition for `variant`. Does not touch the running proxy.
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
pub fn write_site(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    config: &DeploymentConfig,
    settings: &Settings,
    variant: ProxyVariant,
) -> Result<()> {
    let content = render::render_proxy_site(config, settings, variant)?;
    let path = settings.site_available();
    host.fs
        .write(&path, &content)
        .with_context(|| format!("writing {variant:?} site to {}", path.display()))
}

/// Enable the site and disable the distribution's default site, which would
/// otherwise also claim port 80.
///
/// # Errors
///
/// Returns an error if the symlink cannot be created or the default removed.
pub fn enable_site(host: &Host<'_, impl CommandRunner, impl HostFs>, settings: &Settings) -> Result<()> {
    host.fs
        .symlink(&settings.site_available(), &settings.site_enabled())?;
    host.fs
        .remove_file(&Path::new(NGINX_SITES_ENABLED).join("default"))
}

/// `nginx -t`.
///
/// # Errors
///
/// Returns an error with nginx's diagnostics if the configuration is invalid.
pub async fn validate(host: &Host<'_, impl CommandRunner, impl HostFs>) -> Result<()> {
    host.exec("nginx", &["-t"])
        .await
        .context("nginx configuration is invalid")?;
    Ok(())
}

/// Validate, then restart nginx and enable it at boot.
///
/// # Errors
///
/// Returns an error if validation fails or systemd cannot restart nginx.
pub async fn validate_and_restart(host: &Host<'_, impl CommandRunner, impl HostFs>) -> Result<()> {
    validate(host).await?;
    host.exec("systemctl", &["enable", "nginx"]).await?;
    restart(host).await
}

/// Restart nginx. Starts it when stopped.
///
/// # Errors
///
/// Returns an error if systemd reports failure.
pub async fn restart(host: &Host<'_, impl CommandRunner, impl HostFs>) -> Result<()> {
    host.exec("systemctl", &["restart", "nginx"]).await?;
    Ok(())
}

/// Reload nginx configuration without dropping connections.
///
/// # Errors
///
/// Returns an error if systemd reports failure.
pub async fn reload(host: &Host<'_, impl CommandRunner, impl HostFs>) -> Result<()> {
    host.exec("systemctl", &["reload", "nginx"]).await?;
    Ok(())
}

/// Stop nginx so port 80 is free.
///
/// # Errors
///
/// Returns an error if systemd reports failure.
pub async fn stop(host: &Host<'_, impl CommandRunner, impl HostFs>) -> Result<()> {
    host.exec("systemctl", &["stop", "nginx"]).await?;
    Ok(())
}

/// Whether systemd reports nginx as active.
pub async fn is_active(host: &Host<'_, impl CommandRunner, impl HostFs>) -> bool {
    host.query("systemctl", &["is-active", "nginx"])
        .await
        .is_some_and(|s| s == "active")
}
