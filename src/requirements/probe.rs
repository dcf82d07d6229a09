//! Yarn installation probe.
//!
//! Yarn counts as installed only when it resolves on PATH *and*
//! `yarn --version`, run inside the working directory, succeeds and prints
//! a version. Running inside the working directory matters: a project can
//! pin a yarn release (`.yarnrc`, `packageManager`) that the global binary
//! delegates to, and a broken pin shows up here.

use std::path::{Path, PathBuf};

use crate::shell::{CommandRunner, NativeCommand};

/// Executable name probed for.
pub const YARN: &str = "yarn";

/// A usable yarn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YarnInstallation {
    /// Resolved executable path.
    pub path: PathBuf,
    /// Version reported by `yarn --version`.
    pub version: String,
}

/// Result of probing for yarn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    /// On PATH and reports a version.
    Installed(YarnInstallation),
    /// Not on PATH.
    Missing,
    /// On PATH, but the version invocation failed.
    Broken { path: PathBuf, reason: String },
}

impl ProbeStatus {
    pub fn installation(&self) -> Option<&YarnInstallation> {
        match self {
            ProbeStatus::Installed(installation) => Some(installation),
            _ => None,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installation().is_some()
    }

    /// Short human-readable reason yarn is unusable, if it is.
    pub fn describe(&self) -> String {
        match self {
            ProbeStatus::Installed(i) => {
                format!("yarn {} at {}", i.version, i.path.display())
            }
            ProbeStatus::Missing => "yarn not found on PATH".to_string(),
            ProbeStatus::Broken { path, reason } => {
                format!("yarn at {} is not working: {}", path.display(), reason)
            }
        }
    }
}

/// `yarn --version` in `working_dir`.
pub fn version_command(working_dir: &Path) -> NativeCommand {
    NativeCommand::new(YARN)
        .arg("--version")
        .current_dir(working_dir)
}

/// Probe for a usable yarn in `working_dir`.
pub fn probe(runner: &dyn CommandRunner, working_dir: &Path) -> ProbeStatus {
    let Some(path) = runner.which(YARN) else {
        tracing::debug!("yarn not found on PATH");
        return ProbeStatus::Missing;
    };
    tracing::debug!("yarn resolved to {}", path.display());

    let result = match runner.output(&version_command(working_dir)) {
        Ok(result) => result,
        Err(e) => {
            return ProbeStatus::Broken {
                path,
                reason: e.to_string(),
            }
        }
    };

    if !result.success {
        let code = result
            .exit_code
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        return ProbeStatus::Broken {
            path,
            reason: format!(
                "`yarn --version` exited with {}: {}",
                code,
                result.output.trim()
            ),
        };
    }

    match parse_version(&result.output) {
        Some(version) => {
            tracing::debug!("yarn version {}", version);
            ProbeStatus::Installed(YarnInstallation { path, version })
        }
        None => ProbeStatus::Broken {
            path,
            reason: "`yarn --version` printed no version".to_string(),
        },
    }
}

/// First non-blank line of the version output.
fn parse_version(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
