//! Live deployment status, re-derived from the host at the end of a run.

use serde::Serialize;

use crate::domain::certificate::CertState;

/// What inspection of the running system found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LiveStatus {
    /// `docker inspect` reports the container as running.
    pub container_running: bool,
    /// `systemctl is-active nginx` reports `active`.
    pub proxy_active: bool,
    /// Certificate and key exist at the domain's certbot paths.
    pub certificate_present: bool,
}

impl LiveStatus {
    /// Problems worth reporting, in display order. Empty when healthy.
    ///
    /// `expected` is what the certificate strategy settled on; a missing
    /// certificate is only a problem when one was reported issued.
    #[must_use]
    pub fn issues(&self, expected: CertState) -> Vec<&'static str> {
        let mut issues = Vec::new();
        if !self.container_running {
            issues.push("application container is not running");
        }
        if !self.proxy_active {
            issues.push("nginx is not active");
        }
        if matches!(expected, CertState::Issued(_)) && !self.certificate_present {
            issues.push("certificate files are missing");
        }
        issues
    }
}

/// Final report of an install run.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub domain: String,
    pub url: String,
    pub admin_user: String,
    pub certificate: CertState,
    pub live: LiveStatus,
}

/// Result of the standalone `status` command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub domain: String,
    pub url: String,
    /// The installed site terminates TLS with a certificate that exists.
    pub tls: bool,
    /// A site definition exists for the deployment.
    pub site_installed: bool,
    pub live: LiveStatus,
}

/// Public URL for the deployment.
#[must_use]
pub fn access_url(domain: &str, tls: bool) -> String {
    if tls {
        format!("https://{domain}")
    } else {
        format!("http://{domain}")
    }
}
