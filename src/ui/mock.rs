//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use yarn_step::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.info("Yarn version:");
//! ui.warning("Failed to cache node_modules");
//!
//! assert!(ui.infos().contains(&"Yarn version:".to_string()));
//! assert!(ui.has_warning("cache"));
//! ```

use super::UserInterface;

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    messages: Vec<String>,
    infos: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    commands: Vec<String>,
    settings: Vec<(String, Vec<(String, String)>)>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn infos(&self) -> &[String] {
        &self.infos
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Command banners shown, without the `$ ` prefix.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn settings(&self) -> &[(String, Vec<(String, String)>)] {
        &self.settings
    }

    /// Whether any warning contains `needle`.
    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.contains(needle))
    }

    /// Whether any info message contains `needle`.
    pub fn has_info(&self, needle: &str) -> bool {
        self.infos.iter().any(|m| m.contains(needle))
    }
}

impl UserInterface for MockUI {
    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn info(&mut self, msg: &str) {
        self.infos.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_command(&mut self, command: &str) {
        self.commands.push(command.to_string());
    }

    fn show_settings(&mut self, title: &str, entries: &[(&str, String)]) {
        self.settings.push((
            title.to_string(),
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));
    }
}
