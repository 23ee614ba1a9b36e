//! Pipeline stages and their outcomes.

use std::fmt;

use serde::Serialize;

/// One named step of the provisioning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Privilege,
    DnsCheck,
    Packages,
    ContainerRuntime,
    ComposePlugin,
    Firewall,
    WorkDir,
    AppConfig,
    ProxyConfig,
    ProxyValidate,
    AppStart,
    Certificate,
    AppReconfigure,
    BackupSchedule,
    Summary,
}

impl Stage {
    /// All stages in the order the orchestrator runs them.
    pub const ALL: [Stage; 15] = [
        Stage::Privilege,
        Stage::DnsCheck,
        Stage::Packages,
        Stage::ContainerRuntime,
        Stage::ComposePlugin,
        Stage::Firewall,
        Stage::WorkDir,
        Stage::AppConfig,
        Stage::ProxyConfig,
        Stage::ProxyValidate,
        Stage::AppStart,
        Stage::Certificate,
        Stage::AppReconfigure,
        Stage::BackupSchedule,
        Stage::Summary,
    ];

    /// Human label used in status lines and fatal error messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Privilege => "verify root privileges",
            Self::DnsCheck => "verify DNS resolution",
            Self::Packages => "install system packages",
            Self::ContainerRuntime => "install Docker",
            Self::ComposePlugin => "install Docker Compose plugin",
            Self::Firewall => "configure firewall",
            Self::WorkDir => "prepare working directory",
            Self::AppConfig => "write application configuration",
            Self::ProxyConfig => "write proxy configuration",
            Self::ProxyValidate => "validate proxy configuration",
            Self::AppStart => "start application container",
            Self::Certificate => "obtain TLS certificate",
            Self::AppReconfigure => "apply protocol settings",
            Self::BackupSchedule => "schedule backups",
            Self::Summary => "final status",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tri-state result of a stage.
///
/// Fatal failures never appear in a finished report: they abort the run as a
/// `ProvisionError` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "kebab-case")]
pub enum Outcome {
    /// The stage did its work, or found it already done.
    Succeeded,
    /// The stage failed but the run continues in a degraded mode.
    FailedRecoverable(String),
    /// The stage failed and the run stops here.
    FailedFatal(String),
}

/// What one stage reported when it completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    #[serde(flatten)]
    pub outcome: Outcome,
}
