//! Application service — the provisioning pipeline.
//!
//! Runs every stage once, top to bottom, and stops at the first fatal
//! failure. Nothing is rolled back on abort. Imports only from
//! `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{AddressResolver, CommandRunner, HostFs, ProgressReporter, Prompter};
use crate::application::services::certificate::{self, CertOutcome};
use crate::application::services::dns::{self, DnsVerdict};
use crate::application::services::{Host, app, proxy, schedule, status, system};
use crate::domain::render::ProxyVariant;
use crate::domain::status::access_url;
use crate::domain::{CertState, DeploymentConfig, Outcome, ProvisionError, Settings, Stage, StageReport, Summary};

/// Inputs of one run.
pub struct InstallOptions<'a> {
    pub config: &'a DeploymentConfig,
    pub settings: &'a Settings,
    /// Skip resolving the domain before installing.
    pub skip_dns_check: bool,
    /// Binary the backup job should invoke.
    pub exe: &'a Path,
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct InstallReport {
    pub stages: Vec<StageReport>,
    pub certificate: CertOutcome,
    pub summary: Summary,
}

struct Ledger<'r, P> {
    reporter: &'r P,
    stages: Vec<StageReport>,
}

impl<P: ProgressReporter> Ledger<'_, P> {
    fn settle(&mut self, stage: Stage, result: Result<Outcome>) -> Result<(), ProvisionError> {
        match result {
            Ok(outcome) => {
                match &outcome {
                    Outcome::Succeeded => self.reporter.success(stage.label()),
                    Outcome::FailedRecoverable(detail) | Outcome::FailedFatal(detail) => {
                        self.reporter.warn(&format!("{stage}: {detail}"));
                    }
                }
                tracing::debug!(%stage, ?outcome, "stage finished");
                self.stages.push(StageReport { stage, outcome });
                Ok(())
            }
            Err(source) => Err(self.fail(stage, source)),
        }
    }

    fn fail(&mut self, stage: Stage, source: anyhow::Error) -> ProvisionError {
        self.reporter.fail(&format!("{stage} failed"));
        self.stages.push(StageReport {
            stage,
            outcome: Outcome::FailedFatal(format!("{source:#}")),
        });
        ProvisionError::StageFailed { stage, source }
    }
}

/// Run the whole pipeline.
///
/// # Errors
///
/// Returns [`ProvisionError::StageFailed`] naming the first stage that failed
/// fatally, or [`ProvisionError::Cancelled`] if the operator declined to go on.
pub async fn install(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    resolver: &impl AddressResolver,
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    opts: InstallOptions<'_>,
) -> Result<InstallReport, ProvisionError> {
    let InstallOptions {
        config,
        settings,
        skip_dns_check,
        exe,
    } = opts;
    let mut ledger = Ledger {
        reporter,
        stages: Vec::new(),
    };

    ledger.settle(Stage::Privilege, system::verify_root(host).await)?;

    if skip_dns_check {
        reporter.info("DNS check skipped");
        ledger.settle(Stage::DnsCheck, Ok(Outcome::Succeeded))?;
    } else {
        match check_dns(resolver, prompter, reporter, config).await {
            Ok(Some(outcome)) => ledger.settle(Stage::DnsCheck, Ok(outcome))?,
            Ok(None) => return Err(ProvisionError::Cancelled(Stage::DnsCheck)),
            Err(source) => return Err(ledger.fail(Stage::DnsCheck, source)),
        }
    }

    match prompter.confirm(&format!("Install n8n for {}?", config.domain()), true) {
        Ok(true) => {}
        Ok(false) => return Err(ProvisionError::Cancelled(Stage::Packages)),
        Err(source) => return Err(ledger.fail(Stage::Packages, source)),
    }

    ledger.settle(Stage::Packages, system::install_packages(host, reporter).await)?;
    ledger.settle(Stage::ContainerRuntime, system::ensure_docker(host, reporter).await)?;
    ledger.settle(Stage::ComposePlugin, system::ensure_compose_plugin(host, reporter).await)?;
    ledger.settle(Stage::Firewall, system::configure_firewall(host, reporter).await)?;
    ledger.settle(Stage::WorkDir, system::prepare_work_dir(host, settings).await)?;

    ledger.settle(
        Stage::AppConfig,
        app::write_descriptor(host, config, settings, CertState::None).map(|()| Outcome::Succeeded),
    )?;
    ledger.settle(
        Stage::ProxyConfig,
        proxy::write_site(host, config, settings, ProxyVariant::Plain)
            .and_then(|()| proxy::enable_site(host, settings))
            .map(|()| Outcome::Succeeded),
    )?;
    ledger.settle(
        Stage::ProxyValidate,
        proxy::validate_and_restart(host).await.map(|()| Outcome::Succeeded),
    )?;

    reporter.step("starting application container...");
    ledger.settle(
        Stage::AppStart,
        app::start(host, settings).await.map(|()| Outcome::Succeeded),
    )?;

    let cert = match certificate::acquire(host, reporter, config, settings).await {
        Ok(cert) => cert,
        Err(source) => return Err(ledger.fail(Stage::Certificate, source)),
    };
    let cert_outcome = match cert.state {
        CertState::Issued(_) => Outcome::Succeeded,
        _ => Outcome::FailedRecoverable("serving plaintext HTTP".to_string()),
    };
    ledger.settle(Stage::Certificate, Ok(cert_outcome))?;

    reporter.step("applying protocol settings...");
    let reconfigured = match app::write_descriptor(host, config, settings, cert.state) {
        Ok(()) => app::recreate(host, settings).await,
        Err(e) => Err(e),
    };
    ledger.settle(Stage::AppReconfigure, reconfigured.map(|()| Outcome::Succeeded))?;

    ledger.settle(
        Stage::BackupSchedule,
        schedule::install_backup_job(host, settings, exe),
    )?;

    let live = status::inspect(host, settings, config.domain()).await;
    let issues = live.issues(cert.state);
    let summary_outcome = if issues.is_empty() {
        Outcome::Succeeded
    } else {
        Outcome::FailedRecoverable(issues.join("; "))
    };
    ledger.settle(Stage::Summary, Ok(summary_outcome))?;

    let summary = Summary {
        domain: config.domain().to_string(),
        url: access_url(config.domain(), matches!(cert.state, CertState::Issued(_))),
        admin_user: config.admin_user().to_string(),
        certificate: cert.state,
        live,
    };
    Ok(InstallReport {
        stages: ledger.stages,
        certificate: cert,
        summary,
    })
}

/// `Ok(Some(_))` to continue, `Ok(None)` when the operator declined.
async fn check_dns(
    resolver: &impl AddressResolver,
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    config: &DeploymentConfig,
) -> Result<Option<Outcome>> {
    let verdict = dns::verify(resolver, config.domain(), config.public_ip()).await;
    let description = verdict.describe(config.domain(), config.public_ip());
    if verdict == DnsVerdict::Matches {
        reporter.info(&description);
        return Ok(Some(Outcome::Succeeded));
    }
    reporter.warn(&description);
    reporter.warn("certificate issuance will fail until DNS points at this server");
    if prompter.confirm("Continue anyway?", false)? {
        Ok(Some(Outcome::FailedRecoverable(description)))
    } else {
        Ok(None)
    }
}
