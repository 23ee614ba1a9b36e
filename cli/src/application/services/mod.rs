//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod app;
pub mod backup;
pub mod certificate;
pub mod dns;
pub mod input;
pub mod install;
pub mod proxy;
pub mod schedule;
pub mod status;
pub mod system;

use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, HostFs};

/// Timeout for package installation and the Docker convenience script.
pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(30 * 60);
/// Timeout for `docker compose up`, which may pull the image.
pub const COMPOSE_TIMEOUT: Duration = Duration::from_secs(10 * 60);
/// Timeout for one certbot invocation.
pub const CERTBOT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// The side-effecting ports every host stage needs.
pub struct Host<'a, R, F> {
    pub runner: &'a R,
    pub fs: &'a F,
}

impl<'a, R: CommandRunner, F: HostFs> Host<'a, R, F> {
    #[must_use]
    pub fn new(runner: &'a R, fs: &'a F) -> Self {
        Self { runner, fs }
    }

    /// Run a command and require a zero exit status.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the command line and the tail of stderr if
    /// the program cannot be spawned or exits non-zero.
    pub async fn exec(&self, program: &str, args: &[&str]) -> Result<Output> {
        let output = self
            .runner
            .run(program, args)
            .await
            .with_context(|| format!("running {}", command_line(program, args)))?;
        require_success(output, program, args)
    }

    /// [`Host::exec`] with a timeout override for long-running commands.
    ///
    /// # Errors
    ///
    /// Same as [`Host::exec`], plus timeout expiry.
    pub async fn exec_long(&self, program: &str, args: &[&str], timeout: Duration) -> Result<Output> {
        let output = self
            .runner
            .run_with_timeout(program, args, timeout)
            .await
            .with_context(|| format!("running {}", command_line(program, args)))?;
        require_success(output, program, args)
    }

    /// Trimmed stdout of a command, or `None` if it fails to run or exits non-zero.
    pub async fn query(&self, program: &str, args: &[&str]) -> Option<String> {
        match self.runner.run(program, args).await {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(program, error = %e, "query failed to run");
                None
            }
        }
    }
}

fn require_success(output: Output, program: &str, args: &[&str]) -> Result<Output> {
    if output.status.success() {
        return Ok(output);
    }
    let code = output
        .status
        .code()
        .map_or_else(|| "signal".to_string(), |c| c.to_string());
    anyhow::bail!(
        "{} exited with {code}: {}",
        command_line(program, args),
        stderr_tail(&output)
    )
}

/// The last few meaningful lines a failing command wrote to stderr.
#[must_use]
pub fn stderr_tail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines.is_empty() {
        return "(no error output)".to_string();
    }
    lines[lines.len().saturating_sub(3)..].join(" | ")
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
