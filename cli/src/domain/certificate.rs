//! Certificate acquisition: states, transitions and certbot invocations.
//!
//! The strategy is a two-tier fallback. [`CertStep::next`] is the whole
//! transition table; the application service only performs the side effects
//! belonging to the current step and feeds the result back in.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Root of the certbot certificate store.
pub const LETSENCRYPT_LIVE: &str = "/etc/letsencrypt/live";

/// How a certificate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertMode {
    /// certbot's nginx plugin, cooperating with the running proxy.
    Integrated,
    /// certbot's own listener on port 80, with the proxy stopped.
    Standalone,
}

impl fmt::Display for CertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integrated => f.write_str("integrated (nginx plugin)"),
            Self::Standalone => f.write_str("standalone"),
        }
    }
}

/// Outcome consumed by configuration rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "state", content = "mode")]
pub enum CertState {
    /// No issuance attempted yet.
    None,
    Issued(CertMode),
    /// Both methods failed; the deployment serves plaintext.
    Failed,
}

impl CertState {
    /// Whether the generated files should terminate TLS.
    ///
    /// `None` counts as TLS-fronted: before issuance the application is bound
    /// to loopback behind the proxy, which is where it stays on success.
    #[must_use]
    pub fn tls_fronted(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

impl fmt::Display for CertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("not requested"),
            Self::Issued(mode) => write!(f, "issued via {mode}"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Certificate and key locations, derived only from the domain name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertPaths {
    pub fullchain: PathBuf,
    pub privkey: PathBuf,
}

impl CertPaths {
    #[must_use]
    pub fn for_domain(domain: &str) -> Self {
        let live = Path::new(LETSENCRYPT_LIVE).join(domain);
        Self {
            fullchain: live.join("fullchain.pem"),
            privkey: live.join("privkey.pem"),
        }
    }
}

/// Strategy state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertStep {
    Start,
    IntegratedAttempt,
    StandaloneAttempt,
    Issued(CertMode),
    Failed,
}

impl CertStep {
    /// Advance the machine. `attempt_succeeded` is the result of the side
    /// effects performed in `self`; it is ignored for `Start` and for the
    /// terminal states, which map to themselves.
    #[must_use]
    pub fn next(self, attempt_succeeded: bool) -> Self {
        match (self, attempt_succeeded) {
            (Self::Start, _) => Self::IntegratedAttempt,
            (Self::IntegratedAttempt, true) => Self::Issued(CertMode::Integrated),
            (Self::IntegratedAttempt, false) => Self::StandaloneAttempt,
            (Self::StandaloneAttempt, true) => Self::Issued(CertMode::Standalone),
            (Self::StandaloneAttempt, false) => Self::Failed,
            (terminal @ (Self::Issued(_) | Self::Failed), _) => terminal,
        }
    }

    /// The certificate state this step settles on, once terminal.
    #[must_use]
    pub fn terminal_state(self) -> Option<CertState> {
        match self {
            Self::Issued(mode) => Some(CertState::Issued(mode)),
            Self::Failed => Some(CertState::Failed),
            _ => None,
        }
    }

    /// The mode attempted in this step, if it is an attempt.
    #[must_use]
    pub fn attempt_mode(self) -> Option<CertMode> {
        match self {
            Self::IntegratedAttempt => Some(CertMode::Integrated),
            Self::StandaloneAttempt => Some(CertMode::Standalone),
            _ => None,
        }
    }
}

/// certbot arguments for one attempt.
#[must_use]
pub fn certbot_args(mode: CertMode, domain: &str, email: &str, reuse_existing: bool) -> Vec<String> {
    let mut args: Vec<String> = match mode {
        CertMode::Integrated => vec!["--nginx".into()],
        CertMode::Standalone => vec!["certonly".into(), "--standalone".into()],
    };
    args.extend(
        [
            "-d",
            domain,
            "--non-interactive",
            "--agree-tos",
            "-m",
            email,
        ]
        .map(String::from),
    );
    if mode == CertMode::Integrated {
        args.push("--redirect".into());
    }
    if reuse_existing {
        args.push("--keep-until-expiring".into());
    }
    args
}

/// Command an operator can run later to retry issuance by hand.
#[must_use]
pub fn manual_retry_command(domain: &str, email: &str) -> String {
    format!("sudo certbot --nginx -d {domain} --agree-tos -m {email} --redirect")
}
