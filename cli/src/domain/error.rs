//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

use crate::domain::stage::Stage;

// ── Input validation errors ───────────────────────────────────────────────────

/// Errors raised while validating operator input. Always fatal, always raised
/// before the first host mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required and cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} is required but was not supplied (run interactively or pass --{flag})")]
    Missing {
        field: &'static str,
        flag: &'static str,
    },

    #[error("Admin password is required: set N8N_ADMIN_PASSWORD or run interactively")]
    MissingPassword,

    #[error("Invalid domain name '{0}': expected a bare hostname such as n8n.example.com")]
    InvalidDomain(String),

    #[error("Invalid IP address '{0}'")]
    InvalidIp(String),

    #[error("Invalid email address '{0}'")]
    InvalidEmail(String),

    #[error("Invalid backup hour {0}: must be between 0 and 23")]
    InvalidBackupHour(u8),
}

// ── Pipeline errors ───────────────────────────────────────────────────────────

/// A fatal stage failure. Aborts the run; nothing already done is rolled back.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Stage '{stage}' failed: {source:#}")]
    StageFailed {
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },

    #[error("Installation cancelled by operator at stage '{0}'")]
    Cancelled(Stage),
}

impl ProvisionError {
    /// The stage the run stopped at.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::StageFailed { stage, .. } | Self::Cancelled(stage) => *stage,
        }
    }
}

// ── Template errors ───────────────────────────────────────────────────────────

/// Errors raised while rendering generated files.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template '{0}' is not embedded in this build")]
    MissingTemplate(&'static str),

    #[error("Template '{template}' references unknown placeholder '{placeholder}'")]
    UnknownPlaceholder {
        template: &'static str,
        placeholder: String,
    },

    #[error("Cannot serialize application descriptor: {0}")]
    Descriptor(#[from] serde_yaml::Error),
}
