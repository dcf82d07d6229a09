//! Terminal UI for CI logs.

use console::Term;
use std::io::Write;

use super::{should_use_colors, StepTheme, UserInterface};

/// Terminal UI implementation.
///
/// Status goes to stdout; warnings and errors go to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: StepTheme,
}

impl TerminalUI {
    /// Create a new terminal UI, coloring output when stdout is a TTY.
    pub fn new() -> Self {
        let theme = if should_use_colors() {
            StepTheme::new()
        } else {
            StepTheme::plain()
        };

        Self::with_theme(theme)
    }

    pub fn with_theme(theme: StepTheme) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
        }
    }
}

impl Default for TerminalUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        writeln!(self.out, "{}", msg).ok();
    }

    fn info(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_info(msg)).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_command(&mut self, command: &str) {
        writeln!(self.out).ok();
        writeln!(self.out, "{}", self.theme.format_command(command)).ok();
        writeln!(self.out).ok();
    }

    fn show_settings(&mut self, title: &str, entries: &[(&str, String)]) {
        writeln!(self.out, "{}", self.theme.format_info(title)).ok();
        for (key, value) in entries {
            writeln!(self.out, "{}", self.theme.format_entry(key, value)).ok();
        }
        writeln!(self.out).ok();
    }
}
