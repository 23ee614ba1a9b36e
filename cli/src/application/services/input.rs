//! Gathering operator input into a validated [`DeploymentConfig`].

use anyhow::Result;

use crate::application::ports::Prompter;
use crate::domain::deployment::{
    DEFAULT_ADMIN_USER, DEFAULT_TIMEZONE, check_password, parse_domain, parse_email, parse_ip,
};
use crate::domain::{DeploymentConfig, RawDeployment};

/// Prompt for every value `raw` is missing, then validate.
///
/// Required values are asked once and checked before the next prompt, so an
/// empty or malformed answer aborts without asking anything further.
///
/// # Errors
///
/// Returns an error if a prompt fails or validation rejects the input.
pub fn collect(raw: RawDeployment, prompter: &impl Prompter) -> Result<DeploymentConfig> {
    let mut raw = raw;
    if raw.domain.is_none() {
        raw.domain = prompter.input("Domain name (e.g. n8n.example.com)", None)?;
    }
    parse_domain(raw.domain.as_deref())?;
    if raw.public_ip.is_none() {
        raw.public_ip = prompter.input("Public IP address of this server", None)?;
    }
    parse_ip(raw.public_ip.as_deref())?;
    if raw.email.is_none() {
        raw.email = prompter.input("Email for certificate notices", None)?;
    }
    parse_email(raw.email.as_deref())?;
    if raw.admin_user.is_none() {
        raw.admin_user = prompter.input("Admin username", Some(DEFAULT_ADMIN_USER))?;
    }
    if raw.admin_password.is_none() {
        raw.admin_password = prompter.password("Admin password")?;
    }
    check_password(raw.admin_password.as_ref())?;
    if raw.timezone.is_none() {
        raw.timezone = prompter.input("Timezone", Some(DEFAULT_TIMEZONE))?;
    }
    Ok(DeploymentConfig::validate(raw)?)
}
