//! Status lines on stderr
//!
//! stdout carries only the merged report, so every human-facing line goes
//! through [`StatusReporter`] to stderr.

use console::{style, Style, Term};
use covrun::{Diagnostics, RunSummary};

/// Status reporter for coverage runs
#[derive(Debug)]
pub struct StatusReporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl StatusReporter {
    /// Create a new status reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    fn prefix(&self, symbol: &str, plain: &str, color: &Style) -> String {
        if self.use_color {
            color.apply_to(symbol).bold().to_string()
        } else {
            plain.to_string()
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefix("✓", "DONE", &Style::new().green());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = self.prefix("✗", "FAIL", &Style::new().red());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message, even in quiet mode
    pub fn warning(&self, message: &str) {
        let prefix = self.prefix("⚠", "WARN", &Style::new().yellow());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefix("ℹ", "INFO", &Style::new().blue());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print what a finished run did
    pub fn run_summary(&self, summary: &RunSummary) {
        if self.quiet {
            return;
        }
        let placeholders = if self.use_color && summary.placeholders > 0 {
            style(summary.placeholders).yellow().to_string()
        } else {
            summary.placeholders.to_string()
        };
        self.success(&format!(
            "coverage for {} package(s), {placeholders} without tests, {} profile(s) merged",
            summary.packages, summary.profiles
        ));
    }
}

/// Run diagnostics (leftover files, unparsed listings) are shown even in
/// quiet mode.
impl Diagnostics for StatusReporter {
    fn warn(&self, message: &str) {
        tracing::debug!(diagnostic = message);
        self.warning(message);
    }
}
