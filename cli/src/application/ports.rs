//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::{Duration, SystemTime};

use anyhow::Result;

use crate::domain::{AdminPassword, AnswersFile};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Host Filesystem Port ──────────────────────────────────────────────────────

/// Abstracts the host filesystem paths this tool owns.
pub trait HostFs {
    /// Whether `path` exists (following symlinks).
    fn exists(&self, path: &Path) -> bool;
    /// Create a directory and all parents. Succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Replace the contents of `path` atomically.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Remove a file. Succeeds if it does not exist.
    fn remove_file(&self, path: &Path) -> Result<()>;
    /// Point `link` at `target`, replacing any existing link.
    fn symlink(&self, target: &Path, link: &Path) -> Result<()>;
    /// Set Unix permission bits. A no-op on other platforms.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
}

// ── DNS Port ──────────────────────────────────────────────────────────────────

/// Abstracts hostname resolution so the DNS check can be tested offline.
#[allow(async_fn_in_trait)]
pub trait AddressResolver {
    /// Resolve `hostname` to every address it currently maps to.
    async fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>>;
}

// ── Operator Interaction Ports ────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an informational message.
    fn info(&self, message: &str);
    /// Emit a failure message.
    fn fail(&self, message: &str);
}

/// Abstracts interactive questions. In non-interactive mode implementations
/// answer with `default`, or `None` where there is none.
pub trait Prompter {
    /// Ask for a line of text. `default` is offered and returned on empty input.
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<Option<String>>;
    /// Ask for a secret without echoing it.
    fn password(&self, prompt: &str) -> Result<Option<AdminPassword>>;
    /// Ask a yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts where pre-filled answers come from.
pub trait AnswersStore {
    /// Load the answers file, or defaults when none is configured.
    fn load(&self) -> Result<AnswersFile>;
    /// Path that was (or would be) read.
    fn path(&self) -> Option<PathBuf>;
}

// ── Backup Port ───────────────────────────────────────────────────────────────

/// A backup archive on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Abstracts archive creation and listing for the backup routine.
pub trait BackupStore {
    /// Write a gzip-compressed tarball of `source` to `dest`.
    fn create_archive(&self, source: &Path, dest: &Path) -> Result<u64>;
    /// List every regular file directly under `dir`.
    fn list(&self, dir: &Path) -> Result<Vec<ArchiveEntry>>;
    /// Delete one archive.
    fn remove(&self, path: &Path) -> Result<()>;
}
