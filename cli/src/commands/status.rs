//! `status` — inspect an existing deployment.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::AnswersStore as _;
use crate::application::services::status;
use crate::domain::deployment::validate_domain;
use crate::domain::ValidationError;
use crate::domain::status::StatusReport;
use crate::infra::config::YamlAnswersStore;
use crate::output::json;

/// Arguments for the status command.
#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Domain of the deployment (falls back to the answers file)
    #[arg(long)]
    pub domain: Option<String>,

    /// YAML answers file (also `N8N_PROVISION_CONFIG`)
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Run the status command.
///
/// With `--json`, a failure is also printed to stdout as an error object.
///
/// # Errors
///
/// Returns an error if no domain is known or the answers file is unreadable.
pub async fn run(app: &AppContext, args: &StatusArgs) -> Result<()> {
    let report = match inspect(app, args).await {
        Ok(report) => report,
        Err(e) if args.json => {
            println!("{}", json::format_error(&format!("{e:#}"), error_code(&e))?);
            return Err(e);
        }
        Err(e) => return Err(e),
    };
    if args.json {
        println!("{}", json::format_report(&report)?);
    } else {
        app.renderer().render_status(&report);
    }
    Ok(())
}

async fn inspect(app: &AppContext, args: &StatusArgs) -> Result<StatusReport> {
    let answers = YamlAnswersStore::new(args.config.clone()).load()?;
    let domain = args
        .domain
        .clone()
        .or(answers.deployment.domain)
        .map(|d| d.trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty())
        .ok_or(ValidationError::Missing {
            field: "domain",
            flag: "domain",
        })?;
    validate_domain(&domain)?;
    Ok(status::report(&app.host(), &answers.settings, &domain).await)
}

fn error_code(e: &anyhow::Error) -> &'static str {
    if e.downcast_ref::<ValidationError>().is_some() {
        "invalid_input"
    } else {
        "config_error"
    }
}
