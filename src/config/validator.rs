//! Input validation.
//!
//! Turns raw [`Cli`] inputs into a [`Config`]:
//! - the working directory must exist and be a directory
//! - the command and arguments strings must split cleanly

use crate::cli::Cli;
use crate::config::schema::{Config, ParsedCommand};
use crate::error::{Result, StepError};
use crate::shell::split;
use std::path::{Path, PathBuf};

/// Validate inputs and build the step configuration.
///
/// Runs before any process is spawned.
pub fn validate(cli: &Cli) -> Result<Config> {
    let working_dir = validate_working_dir(&cli.workdir)?;
    let command = ParsedCommand::new(split(&cli.command)?, split(&cli.args)?);

    Ok(Config {
        working_dir,
        raw_command: cli.command.clone(),
        raw_args: cli.args.clone(),
        command,
        use_cache: cli.cache_local_deps.is_yes(),
        debug_log: cli.verbose_log.is_yes(),
    })
}

/// Check that `dir` is an existing directory and make it absolute.
pub fn validate_working_dir(dir: &Path) -> Result<PathBuf> {
    if dir.as_os_str().is_empty() {
        return Err(StepError::Config {
            message: "workdir: required variable is not present".to_string(),
        });
    }

    let metadata = std::fs::metadata(dir).map_err(|e| StepError::Config {
        message: format!("workdir: {}: {}", dir.display(), e),
    })?;
    if !metadata.is_dir() {
        return Err(StepError::Config {
            message: format!("workdir: {} is not a directory", dir.display()),
        });
    }

    std::path::absolute(dir).map_err(|e| StepError::Config {
        message: format!(
            "workdir: failed to get absolute path of {}: {}",
            dir.display(),
            e
        ),
    })
}
