//! Handing discovered directories to the CI cache.
//!
//! The CI cache reads the directories to persist from a newline separated
//! list in [`CACHE_INCLUDE_PATHS_ENV`]. Steps run as separate processes, so
//! the list is exported with `envman`, which makes it visible to the steps
//! that follow.

use std::path::PathBuf;

use crate::error::{Result, StepError};
use crate::shell::{CommandRunner, NativeCommand};

/// Environment variable holding the cache include list.
pub const CACHE_INCLUDE_PATHS_ENV: &str = "BITRISE_CACHE_INCLUDE_PATHS";

/// Marks paths for inclusion in the CI cache.
pub trait CacheCommitter {
    /// Mark `paths` for caching and commit the change.
    fn commit(&self, paths: &[PathBuf]) -> Result<()>;
}

/// [`CacheCommitter`] that exports the include list through `envman`.
pub struct EnvmanCache<'a> {
    runner: &'a dyn CommandRunner,
    existing: Option<String>,
}

impl<'a> EnvmanCache<'a> {
    /// Create a committer that extends the current process's include list.
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self::with_existing(runner, std::env::var(CACHE_INCLUDE_PATHS_ENV).ok())
    }

    /// Create a committer that extends `existing` instead of the
    /// environment.
    pub fn with_existing(runner: &'a dyn CommandRunner, existing: Option<String>) -> Self {
        Self { runner, existing }
    }

    /// Existing entries followed by `paths`, without duplicates.
    pub fn merged_include_list(&self, paths: &[PathBuf]) -> String {
        let mut entries: Vec<String> = self
            .existing
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        for path in paths {
            let entry = path.display().to_string();
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }

        entries.join("\n")
    }
}

impl CacheCommitter for EnvmanCache<'_> {
    fn commit(&self, paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            tracing::debug!("no paths to cache");
            return Ok(());
        }

        let command = NativeCommand::new("envman").args([
            "add".to_string(),
            "--key".to_string(),
            CACHE_INCLUDE_PATHS_ENV.to_string(),
            "--value".to_string(),
            self.merged_include_list(paths),
        ]);

        let result = self
            .runner
            .output(&command)
            .map_err(|e| StepError::CacheCommit {
                message: e.to_string(),
            })?;

        if !result.success {
            return Err(StepError::CacheCommit {
                message: format!(
                    "envman exited with code {:?}: {}",
                    result.exit_code,
                    result.output.trim()
                ),
            });
        }

        Ok(())
    }
}
