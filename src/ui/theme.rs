//! Visual theme and styling.

use console::Style;

/// Styles for step output.
#[derive(Debug, Clone)]
pub struct StepTheme {
    /// Style for completed actions and command banners (green).
    pub success: Style,
    /// Style for informational messages (blue).
    pub info: Style,
    /// Style for warning messages (yellow).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for key labels in key-value displays (bold).
    pub key: Style,
}

impl Default for StepTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl StepTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            info: Style::new().blue(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            key: Style::new().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or NO_COLOR).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            info: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            key: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        self.success.apply_to(msg).to_string()
    }

    pub fn format_info(&self, msg: &str) -> String {
        self.info.apply_to(msg).to_string()
    }

    pub fn format_warning(&self, msg: &str) -> String {
        self.warning.apply_to(msg).to_string()
    }

    pub fn format_error(&self, msg: &str) -> String {
        self.error.apply_to(msg).to_string()
    }

    /// Format a command banner (`$ yarn install`).
    pub fn format_command(&self, command: &str) -> String {
        self.success.apply_to(format!("$ {}", command)).to_string()
    }

    /// Format one `- key: value` line of a settings listing.
    pub fn format_entry(&self, key: &str, value: &str) -> String {
        format!("- {}: {}", self.key.apply_to(key), value)
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_leaves_text_untouched() {
        let theme = StepTheme::plain();
        assert_eq!(theme.format_warning("careful"), "careful");
        assert_eq!(theme.format_command("yarn install"), "$ yarn install");
        assert_eq!(theme.format_entry("workdir", "/src"), "- workdir: /src");
    }

    #[test]
    fn colored_theme_keeps_text() {
        let theme = StepTheme::new();
        assert!(theme.format_error("boom").contains("boom"));
        assert!(theme.format_info("note").contains("note"));
        assert!(theme.format_success("done").contains("done"));
    }
}
