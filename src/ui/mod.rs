//! Terminal output for step runs.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] writing styled banners to the CI log
//! - [`MockUI`] capturing output for tests
//!
//! # Example
//!
//! ```
//! use yarn_step::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_command("yarn install");
//! assert_eq!(ui.commands(), ["yarn install"]);
//! ```

pub mod mock;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, StepTheme};

/// Trait for user-facing output.
///
/// This trait allows capturing the UI in tests.
pub trait UserInterface {
    /// Display a plain message.
    fn message(&mut self, msg: &str);

    /// Display an informational message.
    fn info(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show the command about to run, surrounded by blank lines.
    fn show_command(&mut self, command: &str);

    /// Show a titled list of `key: value` settings.
    fn show_settings(&mut self, title: &str, entries: &[(&str, String)]);
}
