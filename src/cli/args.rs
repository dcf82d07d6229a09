//! CLI argument definitions.
//!
//! Every input can be given as an environment variable (the way CI step
//! inputs are exported) or as the equivalent long flag. Flags win over
//! environment variables.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// yarn-step - Install yarn if needed, run a yarn command, cache node_modules.
#[derive(Debug, Clone, Parser)]
#[command(name = "yarn-step")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Working directory to run yarn in
    #[arg(long, env = "workdir", default_value = ".")]
    pub workdir: PathBuf,

    /// Yarn command to run (e.g. "install", "run build")
    #[arg(long, env = "command", default_value = "", allow_hyphen_values = true)]
    pub command: String,

    /// Extra arguments appended to the yarn command
    #[arg(long, env = "args", default_value = "", allow_hyphen_values = true)]
    pub args: String,

    /// Mark node_modules directories for the CI cache after an install
    #[arg(long, env = "cache_local_deps", value_enum, default_value_t = Toggle::No)]
    pub cache_local_deps: Toggle,

    /// Enable debug logging
    #[arg(long, env = "verbose_log", value_enum, default_value_t = Toggle::No)]
    pub verbose_log: Toggle,
}

/// A yes/no step input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    Yes,
    No,
}

impl Toggle {
    pub fn is_yes(self) -> bool {
        self == Toggle::Yes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "yarn-step",
            "--workdir",
            "/src",
            "--command",
            "run build",
            "--args",
            "--production",
            "--cache-local-deps",
            "yes",
            "--verbose-log",
            "no",
        ])
        .unwrap();

        assert_eq!(cli.workdir, PathBuf::from("/src"));
        assert_eq!(cli.command, "run build");
        assert_eq!(cli.args, "--production");
        assert!(cli.cache_local_deps.is_yes());
        assert!(!cli.verbose_log.is_yes());
    }

    #[test]
    fn rejects_values_outside_yes_no() {
        let result = Cli::try_parse_from(["yarn-step", "--cache-local-deps", "maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn help_is_not_a_stderr_error() {
        let err = Cli::try_parse_from(["yarn-step", "--help"]).unwrap_err();
        assert!(!err.use_stderr());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
