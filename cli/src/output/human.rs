//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::application::services::install::InstallReport;
use crate::domain::certificate::manual_retry_command;
use crate::domain::{CertState, DeploymentConfig, Settings};
use crate::domain::status::StatusReport;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.info(&format!("n8n-provision v{version}"));
    }

    /// Render the end-of-run summary.
    pub fn render_install(&self, report: &InstallReport, config: &DeploymentConfig, settings: &Settings) {
        let summary = &report.summary;
        self.ctx.header("n8n is installed");
        self.ctx.kv("URL:", &summary.url.style(self.ctx.styles.url).to_string());
        self.ctx.kv("Admin user:", &summary.admin_user);
        self.ctx.kv("Certificate:", &summary.certificate.to_string());
        self.ctx.kv("Data:", &settings.data_dir().display().to_string());
        self.ctx.kv("Backups:", &settings.backup_dir().display().to_string());
        self.ctx.kv("Compose file:", &settings.compose_path().display().to_string());

        let issues = summary.live.issues(summary.certificate);
        if issues.is_empty() {
            self.ctx.success("final check passed");
        } else {
            for issue in issues {
                self.ctx.warn(issue);
            }
        }

        if summary.certificate == CertState::Failed {
            self.ctx.warn("no TLS certificate; n8n is served over plain HTTP");
            self.ctx.info("once DNS points here, retry with:");
            if !self.ctx.quiet {
                println!(
                    "    {}",
                    manual_retry_command(config.domain(), config.email()).style(self.ctx.styles.bold)
                );
            }
        }
    }

    /// Render the standalone status report.
    pub fn render_status(&self, report: &StatusReport) {
        self.ctx.header(&report.domain);
        self.ctx.kv("URL:", &report.url);
        if report.site_installed {
            self.ctx.success("nginx site installed");
        } else {
            self.ctx.warn("nginx site not installed");
        }
        if report.live.proxy_active {
            self.ctx.success("nginx active");
        } else {
            self.ctx.warn("nginx inactive");
        }
        if report.live.container_running {
            self.ctx.success("n8n container running");
        } else {
            self.ctx.warn("n8n container not running");
        }
        if report.tls {
            self.ctx.success("TLS certificate in use");
        } else if report.live.certificate_present {
            self.ctx.warn("certificate present but site serves plain HTTP");
        } else {
            self.ctx.warn("no TLS certificate");
        }
    }
}
