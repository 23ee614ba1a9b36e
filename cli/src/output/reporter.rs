//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` shows a spinner on a TTY, or prints `"  → {message}"` otherwise
/// - every other event clears the active spinner and prints a status line
/// - `fail()` is never suppressed
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    fn settle(&self) {
        if let Some(pb) = self.active.borrow_mut().take() {
            progress::clear(&pb);
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.settle();
        tracing::debug!(message, "step");
        if self.ctx.show_progress() {
            *self.active.borrow_mut() = Some(progress::spinner(message));
        } else {
            self.ctx.step(message);
        }
    }

    fn success(&self, message: &str) {
        self.settle();
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.settle();
        tracing::warn!(message);
        self.ctx.warn(message);
    }

    fn info(&self, message: &str) {
        self.settle();
        self.ctx.info(message);
    }

    fn fail(&self, message: &str) {
        self.settle();
        self.ctx.error(message);
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        self.settle();
    }
}
