//! `install` — provision n8n on this host.

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::input;
use crate::application::services::install::{self, InstallOptions};
use crate::commands::DeploymentArgs;
use crate::output::reporter::TerminalReporter;

/// Arguments for the install command.
#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    #[command(flatten)]
    pub deployment: DeploymentArgs,

    /// Do not check that the domain resolves to this server
    #[arg(long)]
    pub skip_dns_check: bool,

    /// Keep an existing certificate that is not close to expiry
    #[arg(long)]
    pub reuse_certificate: bool,
}

/// Run the install command.
///
/// # Errors
///
/// Returns an error if input is invalid, the operator cancels, or a stage
/// fails fatally.
pub async fn run(app: &AppContext, args: &InstallArgs) -> Result<()> {
    let (raw, answers) = args.deployment.resolve()?;
    let mut settings = answers.settings;
    settings.reuse_certificate |= args.reuse_certificate;
    settings.validate()?;

    let config = input::collect(raw, app)?;
    tracing::debug!(?config, ?settings, "validated input");

    let exe = std::env::current_exe().context("cannot locate the n8n-provision executable")?;
    let host = app.host();
    let report = {
        let reporter = TerminalReporter::new(&app.output);
        install::install(
            &host,
            &app.resolver,
            app,
            &reporter,
            InstallOptions {
                config: &config,
                settings: &settings,
                skip_dns_check: args.skip_dns_check,
                exe: &exe,
            },
        )
        .await?
    };

    app.renderer().render_install(&report, &config, &settings);
    Ok(())
}
