//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Provision n8n behind nginx with a Let's Encrypt certificate
#[derive(Parser)]
#[command(
    name = "n8n-provision",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (`NO_COLOR` with any non-empty value)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Answer prompts with their defaults (also `CI` / `N8N_PROVISION_YES`)
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Log external commands and decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install and configure n8n on this server
    Install(commands::install::InstallArgs),

    /// Print the generated configuration files
    Render(commands::render::RenderArgs),

    /// Archive the n8n data directory
    Backup(commands::backup::BackupArgs),

    /// Show the state of an existing deployment
    Status(commands::status::StatusArgs),

    /// Show version
    Version {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            yes,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes },
        });
        match command {
            Command::Install(args) => commands::install::run(&app, &args).await,
            Command::Render(args) => commands::render::run(&app, &args),
            Command::Backup(args) => commands::backup::run(&app, &args),
            Command::Status(args) => commands::status::run(&app, &args).await,
            Command::Version { json } => {
                commands::version::run(json);
                Ok(())
            }
        }
    }
}
