//! Validated step configuration.

use std::path::PathBuf;

/// Yarn subcommand that installs dependencies.
pub const INSTALL_SUBCOMMAND: &str = "install";

/// Yarn command split into subcommand tokens and extra arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    command: Vec<String>,
    args: Vec<String>,
}

impl ParsedCommand {
    pub fn new(command: Vec<String>, args: Vec<String>) -> Self {
        Self { command, args }
    }

    /// First token of the command part, e.g. `install` or `run`.
    ///
    /// Tokens from the extra arguments never count as the subcommand.
    pub fn subcommand(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }

    /// Whether this invocation installs dependencies.
    ///
    /// A bare `yarn` is an install.
    pub fn is_install(&self) -> bool {
        matches!(self.subcommand(), None | Some(INSTALL_SUBCOMMAND))
    }

    /// All tokens passed to yarn, command first.
    pub fn tokens(&self) -> Vec<String> {
        self.command.iter().chain(&self.args).cloned().collect()
    }
}

/// Step configuration, immutable after validation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute working directory.
    pub working_dir: PathBuf,
    /// Command string as given.
    pub raw_command: String,
    /// Arguments string as given.
    pub raw_args: String,
    pub command: ParsedCommand,
    /// Mark node_modules directories for the CI cache.
    pub use_cache: bool,
    pub debug_log: bool,
}

impl Config {
    /// Whether node_modules should be cached after a successful run.
    pub fn should_cache(&self) -> bool {
        self.use_cache && self.command.is_install()
    }

    /// Settings as `(name, value)` pairs for display.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("workdir", self.working_dir.display().to_string()),
            ("command", self.raw_command.clone()),
            ("args", self.raw_args.clone()),
            ("cache_local_deps", yes_no(self.use_cache)),
            ("verbose_log", yes_no(self.debug_log)),
        ]
    }
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}
