//! Application context — unified state passed to every command handler.
//!
//! `AppContext` owns the output context and the concrete infrastructure
//! adapters. Command handlers borrow the ports they need from it.

use anyhow::Result;

use crate::application::ports::Prompter;
use crate::application::services::Host;
use crate::domain::AdminPassword;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::dns::SystemResolver;
use crate::infra::fs::LocalFs;
use crate::output::OutputContext;
use crate::output::human::HumanRenderer;

/// Environment variable that forces non-interactive mode.
pub const YES_ENV: &str = "N8N_PROVISION_YES";

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `N8N_PROVISION_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or
    /// `N8N_PROVISION_YES` environment variables are present.
    pub non_interactive: bool,
    /// Process execution on the host.
    pub runner: TokioCommandRunner,
    /// Host filesystem.
    pub fs: LocalFs,
    /// Name resolution for the DNS check.
    pub resolver: SystemResolver,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var(YES_ENV).is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            non_interactive,
            runner: TokioCommandRunner::default(),
            fs: LocalFs,
            resolver: SystemResolver,
        }
    }

    /// The command runner and filesystem bundled for application services.
    #[must_use]
    pub fn host(&self) -> Host<'_, TokioCommandRunner, LocalFs> {
        Host::new(&self.runner, &self.fs)
    }

    /// Human renderer over this context's output.
    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or
    /// `N8N_PROVISION_YES` env), returns `default` immediately without
    /// prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}

impl Prompter for AppContext {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<Option<String>> {
        if self.non_interactive {
            return Ok(default.map(str::to_string));
        }
        let mut input = dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        let answer = input.interact_text()?;
        Ok(Some(answer))
    }

    fn password(&self, prompt: &str) -> Result<Option<AdminPassword>> {
        if self.non_interactive {
            return Ok(None);
        }
        let secret = dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        Ok(Some(AdminPassword::new(secret)))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        AppContext::confirm(self, prompt, default)
    }
}
