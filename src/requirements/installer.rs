//! Yarn installation.
//!
//! Exactly one strategy is picked per run:
//! - Ubuntu: add the yarn apt repository and `apt-get install yarn`
//! - elsewhere, when npm is available: `npm install --global yarn`
//!
//! Anything else is refused. A failed install is never retried with
//! another strategy.

use std::path::PathBuf;

use crate::error::{Result, StepError};
use crate::shell::{self, CommandRunner, NativeCommand};
use crate::ui::UserInterface;

/// Facts about the machine that decide the install strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Operating system name, as in `std::env::consts::OS`.
    pub os: String,
    /// `/etc/lsb-release` is present.
    pub ubuntu: bool,
    /// Running as root, so `sudo` is unnecessary.
    pub elevated: bool,
    /// Resolved `npm`, if any.
    pub npm: Option<PathBuf>,
}

impl Platform {
    /// Detect the current machine.
    pub fn detect(runner: &dyn CommandRunner) -> Self {
        let platform = Self {
            os: shell::os_name().to_string(),
            ubuntu: shell::has_lsb_release(),
            elevated: shell::is_elevated(),
            npm: runner.which("npm"),
        };
        tracing::debug!("detected platform: {:?}", platform);
        platform
    }

    fn is_linux(&self) -> bool {
        self.os == "linux"
    }
}

/// How yarn gets installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Yarn's Debian repository via apt.
    Apt { sudo: bool },
    /// `npm install --global yarn`.
    Npm,
}

impl InstallStrategy {
    /// Pick the strategy for `platform`.
    pub fn select(platform: &Platform) -> Result<Self> {
        if platform.is_linux() && platform.ubuntu {
            return Ok(InstallStrategy::Apt {
                sudo: !platform.elevated,
            });
        }
        if platform.npm.is_some() {
            return Ok(InstallStrategy::Npm);
        }

        let message = if platform.is_linux() {
            "only Ubuntu distribution supported (npm not found for fallback install)".to_string()
        } else {
            format!(
                "unsupported platform {} (npm not found for fallback install)",
                platform.os
            )
        };
        Err(StepError::UnsupportedPlatform { message })
    }

    /// The single native command that performs the install.
    pub fn command(&self) -> NativeCommand {
        match self {
            InstallStrategy::Apt { sudo } => {
                NativeCommand::new("sh").arg("-c").arg(apt_script(*sudo))
            }
            InstallStrategy::Npm => {
                NativeCommand::new("npm").args(["install", "--global", "yarn"])
            }
        }
    }
}

fn apt_script(sudo: bool) -> String {
    let sudo = if sudo { "sudo " } else { "" };
    format!(
        "curl -sS https://dl.yarnpkg.com/debian/pubkey.gpg | {sudo}apt-key add -\n\
         echo \"deb https://dl.yarnpkg.com/debian/ stable main\" | {sudo}tee /etc/apt/sources.list.d/yarn.list\n\
         {sudo}apt-get update && {sudo}apt-get install -y yarn"
    )
}

/// Install yarn on `platform`, streaming the installer's output.
pub fn install(
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    platform: &Platform,
) -> Result<()> {
    let strategy = InstallStrategy::select(platform)?;
    tracing::debug!("installing yarn with {:?}", strategy);

    let command = strategy.command();
    ui.show_command(&command.printable());
    runner.run(&command)
}
