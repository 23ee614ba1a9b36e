//! Live inspection of the deployed services.

use crate::application::ports::{CommandRunner, HostFs};
use crate::application::services::{Host, app, proxy};
use crate::domain::status::{StatusReport, access_url};
use crate::domain::{CertPaths, LiveStatus, Settings};

/// Query the container runtime, systemd and the certificate store.
pub async fn inspect(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    settings: &Settings,
    domain: &str,
) -> LiveStatus {
    let paths = CertPaths::for_domain(domain);
    LiveStatus {
        container_running: app::is_running(host, settings).await,
        proxy_active: proxy::is_active(host).await,
        certificate_present: host.fs.exists(&paths.fullchain) && host.fs.exists(&paths.privkey),
    }
}

/// Status of an existing deployment, for `status` runs outside an install.
///
/// TLS is considered enabled when the site on disk references a certificate
/// and that certificate exists.
pub async fn report(
    host: &Host<'_, impl CommandRunner, impl HostFs>,
    settings: &Settings,
    domain: &str,
) -> StatusReport {
    let live = inspect(host, settings, domain).await;
    let site = host.fs.read_to_string(&settings.site_available()).ok();
    let tls = live.certificate_present
        && site.as_deref().is_some_and(|s| s.contains("ssl_certificate "));
    StatusReport {
        domain: domain.to_string(),
        url: access_url(domain, tls),
        tls,
        site_installed: site.is_some(),
        live,
    }
}
