//! Recurring backup job.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, HostFs};
use crate::application::services::Host;
use crate::domain::stage::Outcome;
use crate::domain::{Settings, render};

const CRON_MODE: u32 = 0o644;

/// Install the `/etc/cron.d` entry. The whole file is rewritten on every run,
/// so repeating the install never duplicates the job.
///
/// The job is installed either way, but a binary outside
/// [`render::STABLE_BIN_DIRS`] makes the outcome recoverable-failed.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn install_backup_job(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    settings: &Settings,
    exe: &Path,
) -> Result<Outcome> {
    let path = settings.cron_path();
    host.fs
        .write(&path, &render::render_cron(settings, exe))
        .with_context(|| format!("writing {}", path.display()))?;
    host.fs.set_permissions(&path, CRON_MODE)?;
    if render::is_stable_exe(exe) {
        return Ok(Outcome::Succeeded);
    }
    tracing::warn!(exe = %exe.display(), "backup job points at a binary outside the usual bin dirs");
    Ok(Outcome::FailedRecoverable(format!(
        "the job runs {}; install the binary in {} so it survives",
        exe.display(),
        render::STABLE_BIN_DIRS.join(" or ")
    )))
}
