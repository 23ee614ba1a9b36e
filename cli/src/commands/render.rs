//! `render` — print the generated files without touching the host.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::app::AppContext;
use crate::application::ports::HostFs as _;
use crate::application::services::input;
use crate::commands::DeploymentArgs;
use crate::domain::render::{self, ProxyVariant};
use crate::domain::{CertMode, CertState};

/// Certificate state to render for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    /// Before any issuance attempt
    #[default]
    None,
    /// Issued through the nginx plugin
    Integrated,
    /// Issued by the standalone authenticator
    Standalone,
    /// Both methods failed; plaintext fallback
    Failed,
}

impl From<StateArg> for CertState {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::None => CertState::None,
            StateArg::Integrated => CertState::Issued(CertMode::Integrated),
            StateArg::Standalone => CertState::Issued(CertMode::Standalone),
            StateArg::Failed => CertState::Failed,
        }
    }
}

/// Arguments for the render command.
#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    #[command(flatten)]
    pub deployment: DeploymentArgs,

    /// Certificate state the files are rendered for
    #[arg(long, value_enum, default_value_t)]
    pub state: StateArg,

    /// Write the files into this directory instead of stdout
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

/// A rendered file and the name it is written under.
struct Rendered {
    name: String,
    content: String,
}

/// Run the render command.
///
/// # Errors
///
/// Returns an error if input is invalid or a file cannot be rendered or
/// written.
pub fn run(app: &AppContext, args: &RenderArgs) -> Result<()> {
    let (raw, answers) = args.deployment.resolve()?;
    let settings = answers.settings;
    settings.validate()?;
    let config = input::collect(raw, app)?;
    let state = CertState::from(args.state);

    let exe = std::env::current_exe().context("cannot locate the n8n-provision executable")?;
    let files = [
        Rendered {
            name: "docker-compose.yml".to_string(),
            content: render::render_compose(&config, &settings, state)?,
        },
        Rendered {
            name: format!("{}.conf", settings.site_name),
            content: render::render_proxy_site(&config, &settings, ProxyVariant::for_state(state))?,
        },
        Rendered {
            name: format!("{}-backup", settings.site_name),
            content: render::render_cron(&settings, &exe),
        },
    ];

    match &args.out_dir {
        Some(dir) => write_all(app, dir, &files),
        None => {
            for file in &files {
                println!("# ── {} ──", file.name);
                print!("{}", file.content);
                println!();
            }
            Ok(())
        }
    }
}

fn write_all(app: &AppContext, dir: &Path, files: &[Rendered]) -> Result<()> {
    app.fs.create_dir_all(dir)?;
    for file in files {
        let path = dir.join(&file.name);
        app.fs
            .write(&path, &file.content)
            .with_context(|| format!("writing {}", path.display()))?;
        app.output.success(&format!("wrote {}", path.display()));
    }
    Ok(())
}
