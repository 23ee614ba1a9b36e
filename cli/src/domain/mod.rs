//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`
//! sockets. All functions are synchronous and take data in, returning data out.

pub mod backup;
pub mod certificate;
pub mod deployment;
pub mod error;
pub mod firewall;
pub mod render;
pub mod stage;
pub mod status;

pub use certificate::{CertMode, CertPaths, CertState, CertStep};
pub use deployment::{AdminPassword, AnswersFile, DeploymentConfig, RawDeployment, Settings};
pub use error::{ProvisionError, RenderError, ValidationError};
pub use stage::{Outcome, Stage, StageReport};
pub use status::{LiveStatus, Summary};
