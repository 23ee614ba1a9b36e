//! Terminal output for the provisioning run.
//!
//! Status lines go to stdout, except errors which go to stderr. Spinners are
//! drawn on stderr, so they are only shown when stderr is a terminal.

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use styles::Styles;

/// Width the `kv` keys are padded to so summary values line up.
const KEY_WIDTH: usize = 14;

/// Styling and verbosity shared by the renderer and the progress reporter.
pub struct OutputContext {
    pub styles: Styles,
    /// Suppress everything except errors.
    pub quiet: bool,
    spinners: bool,
}

impl OutputContext {
    /// Colors need stdout on a terminal; `no_color` already folds in
    /// `NO_COLOR` through clap.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let mut styles = Styles::default();
        if !no_color && Term::stdout().is_term() {
            styles.colorize();
        }
        Self {
            styles,
            quiet,
            spinners: !quiet && Term::stderr().is_term(),
        }
    }

    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.spinners
    }

    /// `→` line for a step when no spinner is shown.
    pub fn step(&self, msg: &str) {
        self.line("→", self.styles.info, msg);
    }

    pub fn success(&self, msg: &str) {
        self.line("✓", self.styles.success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line("⚠", self.styles.warning, msg);
    }

    /// Printed to stderr even when `quiet`.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    pub fn info(&self, msg: &str) {
        self.line("ℹ", self.styles.info, msg);
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Summary row: dimmed key padded to a fixed width, then the value.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("    {}{value}", format!("{key:<width$}", width = KEY_WIDTH).style(self.styles.dim));
        }
    }

    fn line(&self, glyph: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", glyph.style(style));
        }
    }
}
