//! Certificate acquisition with fallback.
//!
//! Drives [`CertStep`] from `Start` to a terminal state. The integrated
//! attempt always runs first because it needs no proxy outage; the standalone
//! attempt runs at most once. On `Failed` the plaintext site is restored so
//! the application stays reachable.

use anyhow::Result;

use crate::application::ports::{CommandRunner, HostFs, ProgressReporter};
use crate::application::services::{CERTBOT_TIMEOUT, Host, proxy, stderr_tail};
use crate::domain::certificate::certbot_args;
use crate::domain::render::ProxyVariant;
use crate::domain::{CertMode, CertPaths, CertState, CertStep, DeploymentConfig, Settings};

/// What the strategy settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertOutcome {
    pub state: CertState,
    /// Certificate and key paths, present only when issued.
    pub paths: Option<CertPaths>,
    /// Modes attempted, in order.
    pub attempts: Vec<CertMode>,
}

/// Run the strategy to completion.
///
/// # Errors
///
/// Only local failures (rendering or writing the site file) are errors.
/// Issuance failures are absorbed into [`CertState::Failed`].
pub async fn acquire(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    reporter: &impl ProgressReporter,
    config: &DeploymentConfig,
    settings: &Settings,
) -> Result<CertOutcome> {
    let mut step = CertStep::Start;
    let mut attempts = Vec::new();

    let state = loop {
        if let Some(state) = step.terminal_state() {
            break state;
        }
        let succeeded = match step.attempt_mode() {
            Some(mode) => {
                attempts.push(mode);
                attempt(host, reporter, config, settings, mode).await?
            }
            None => true,
        };
        step = step.next(succeeded);
    };

    match state {
        CertState::Issued(mode) => reporter.success(&format!("certificate issued via {mode}")),
        _ => {
            reporter.fail("certificate issuance failed with both methods; serving plaintext");
            restore_plaintext(host, reporter, config, settings).await?;
        }
    }

    Ok(CertOutcome {
        state,
        paths: matches!(state, CertState::Issued(_)).then(|| CertPaths::for_domain(config.domain())),
        attempts,
    })
}

async fn attempt(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    reporter: &impl ProgressReporter,
    config: &DeploymentConfig,
    settings: &Settings,
    mode: CertMode,
) -> Result<bool> {
    match mode {
        CertMode::Integrated => integrated(host, reporter, config, settings).await,
        CertMode::Standalone => standalone(host, reporter, config, settings).await,
    }
}

async fn certbot(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    reporter: &impl ProgressReporter,
    config: &DeploymentConfig,
    settings: &Settings,
    mode: CertMode,
) -> bool {
    let args = certbot_args(mode, config.domain(), config.email(), settings.reuse_certificate);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match host.runner.run_with_timeout("certbot", &args, CERTBOT_TIMEOUT).await {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            reporter.warn(&format!("certbot ({mode}) failed: {}", stderr_tail(&output)));
            false
        }
        Err(e) => {
            reporter.warn(&format!("certbot ({mode}) could not run: {e:#}"));
            false
        }
    }
}

/// certbot's nginx plugin answers the challenge through the live proxy and
/// rewrites the site itself. The site is then normalized to the TLS template
/// so both modes leave the same file; certbot's version is kept if ours does
/// not validate.
async fn integrated(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    reporter: &impl ProgressReporter,
    config: &DeploymentConfig,
    settings: &Settings,
) -> Result<bool> {
    reporter.step("requesting certificate through nginx...");
    if !certbot(host, reporter, config, settings, CertMode::Integrated).await {
        return Ok(false);
    }

    let site = settings.site_available();
    let certbot_site = host.fs.read_to_string(&site).ok();
    proxy::write_site(host, config, settings, ProxyVariant::Tls)?;
    if let Err(e) = proxy::validate(host).await {
        tracing::warn!(error = %format!("{e:#}"), "TLS template rejected; keeping certbot's site");
        if let Some(previous) = certbot_site {
            host.fs.write(&site, &previous)?;
        }
    }
    if let Err(e) = proxy::reload(host).await {
        reporter.warn(&format!("nginx reload failed: {e:#}"));
    }
    Ok(true)
}

/// certbot's own listener answers the challenge, so nginx is stopped first.
/// On success the TLS site is written, validated and nginx started again.
async fn standalone(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    reporter: &impl ProgressReporter,
    config: &DeploymentConfig,
    settings: &Settings,
) -> Result<bool> {
    reporter.step("stopping nginx and requesting certificate standalone...");
    if let Err(e) = proxy::stop(host).await {
        reporter.warn(&format!("could not stop nginx: {e:#}"));
    }
    if !certbot(host, reporter, config, settings, CertMode::Standalone).await {
        return Ok(false);
    }

    proxy::write_site(host, config, settings, ProxyVariant::Tls)?;
    if let Err(e) = proxy::validate(host).await {
        reporter.warn(&format!("TLS site failed validation: {e:#}"));
        return Ok(false);
    }
    if let Err(e) = proxy::restart(host).await {
        reporter.warn(&format!("nginx did not start with TLS: {e:#}"));
        return Ok(false);
    }
    Ok(true)
}

async fn restore_plaintext(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    reporter: &impl ProgressReporter,
    config: &DeploymentConfig,
    settings: &Settings,
) -> Result<()> {
    proxy::write_site(host, config, settings, ProxyVariant::Plain)?;
    if let Err(e) = proxy::restart(host).await {
        reporter.warn(&format!("nginx did not restart with the plaintext site: {e:#}"));
    }
    Ok(())
}
