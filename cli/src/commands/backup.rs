//! `backup` — archive the data directory and prune old archives.
//!
//! This is what the scheduled job invokes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::backup;
use crate::domain::Settings;
use crate::infra::backup::TarGzStore;
use crate::output::reporter::TerminalReporter;

/// Arguments for the backup command.
#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Deployment working directory
    #[arg(long, default_value = "/opt/n8n")]
    pub work_dir: PathBuf,

    /// Remove archives older than this many days
    #[arg(long, default_value_t = 7)]
    pub retention_days: u32,
}

/// Run the backup command.
///
/// # Errors
///
/// Returns an error if the data directory is missing or the archive cannot be
/// written.
pub fn run(app: &AppContext, args: &BackupArgs) -> Result<()> {
    let settings = Settings {
        work_dir: args.work_dir.clone(),
        backup_retention_days: args.retention_days,
        ..Settings::default()
    };
    let reporter = TerminalReporter::new(&app.output);
    let report = backup::run(
        &TarGzStore,
        &reporter,
        &settings.data_dir(),
        &settings.backup_dir(),
        settings.backup_retention_days,
        chrono::Local::now(),
    )?;
    tracing::info!(archive = %report.archive.display(), bytes = report.bytes, pruned = report.pruned.len(), "backup finished");
    Ok(())
}
