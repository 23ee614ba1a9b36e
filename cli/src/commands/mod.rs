//! Command implementations

pub mod backup;
pub mod install;
pub mod render;
pub mod status;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::application::ports::AnswersStore as _;
use crate::domain::{AdminPassword, AnswersFile, RawDeployment};
use crate::infra::config::YamlAnswersStore;

/// Environment variable carrying the admin password.
pub const PASSWORD_ENV: &str = "N8N_ADMIN_PASSWORD";

/// Deployment values shared by `install` and `render`.
#[derive(Args, Debug, Default)]
pub struct DeploymentArgs {
    /// Domain name n8n will be served on
    #[arg(long)]
    pub domain: Option<String>,

    /// Public IP address of this server
    #[arg(long = "ip")]
    pub public_ip: Option<String>,

    /// Email address for certificate notices
    #[arg(long)]
    pub email: Option<String>,

    /// Admin username [default: admin]
    #[arg(long = "user")]
    pub admin_user: Option<String>,

    /// Timezone for the application [default: Asia/Dhaka]
    #[arg(long)]
    pub timezone: Option<String>,

    /// YAML answers file (also `N8N_PROVISION_CONFIG`)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl DeploymentArgs {
    /// Load the answers file and merge flags over it.
    ///
    /// The password is taken from `N8N_ADMIN_PASSWORD` when set; it is never
    /// read from flags or the answers file.
    ///
    /// # Errors
    ///
    /// Returns an error if the answers file cannot be read or parsed.
    pub fn resolve(&self) -> Result<(RawDeployment, AnswersFile)> {
        let answers = YamlAnswersStore::new(self.config.clone()).load()?;
        let flags = RawDeployment {
            domain: self.domain.clone(),
            public_ip: self.public_ip.clone(),
            email: self.email.clone(),
            admin_user: self.admin_user.clone(),
            admin_password: std::env::var(PASSWORD_ENV).ok().map(AdminPassword::new),
            timezone: self.timezone.clone(),
        };
        let raw = flags.or(answers.deployment.clone());
        Ok((raw, answers))
    }
}
