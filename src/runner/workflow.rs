//! Step orchestration.
//!
//! A run moves through the phases in [`Phase`] order and never goes back:
//! ensure yarn is installed, report its version, run the user's command,
//! then cache node_modules when asked to. The first fatal error ends the
//! run. Caching is best-effort and only ever produces a warning.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::cache::{cache_dependencies, CacheCommitter};
use crate::config::Config;
use crate::error::{InPhase, Phase, Result, RunFailure, StepError};
use crate::requirements::{self, Platform, ProbeStatus, YarnInstallation, YARN};
use crate::shell::{CommandRunner, NativeCommand};
use crate::ui::UserInterface;

use super::patterns;

/// Runs the yarn step for one configuration.
pub struct YarnStep<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
    committer: &'a dyn CacheCommitter,
    platform: Platform,
}

/// Result of a successful run.
#[derive(Debug)]
pub struct StepOutcome {
    /// The yarn that ran the command.
    pub installation: YarnInstallation,
    /// Whether yarn was installed during this run.
    pub freshly_installed: bool,
    /// Directories marked for caching, if caching ran and succeeded.
    pub cached_paths: Option<Vec<PathBuf>>,
    /// Non-fatal problems, in the order they were reported.
    pub warnings: Vec<String>,
    /// Total duration.
    pub duration: Duration,
}

impl<'a> YarnStep<'a> {
    pub fn new(
        config: &'a Config,
        runner: &'a dyn CommandRunner,
        committer: &'a dyn CacheCommitter,
        platform: Platform,
    ) -> Self {
        Self {
            config,
            runner,
            committer,
            platform,
        }
    }

    /// Run every phase after configuration parsing.
    pub fn run(&self, ui: &mut dyn UserInterface) -> std::result::Result<StepOutcome, RunFailure> {
        let start = Instant::now();

        let (status, freshly_installed) = self
            .ensure_installed(ui)
            .in_phase(Phase::EnsureInstalled)?;
        let installation = self
            .report_version(ui, status)
            .in_phase(Phase::ReportVersion)?;
        self.execute(ui).in_phase(Phase::Execute)?;

        let mut warnings = Vec::new();
        let cached_paths = if self.config.should_cache() {
            match self.cache(ui) {
                Ok(paths) => Some(paths),
                Err(e) => {
                    let message = format!("Failed to cache node_modules, error: {}", e);
                    warn!("{}", message);
                    ui.warning(&message);
                    warnings.push(message);
                    None
                }
            }
        } else {
            debug!(
                "skipping cache (cache_local_deps: {}, subcommand: {:?})",
                self.config.use_cache,
                self.config.command.subcommand()
            );
            None
        };

        Ok(StepOutcome {
            installation,
            freshly_installed,
            cached_paths,
            warnings,
            duration: start.elapsed(),
        })
    }

    /// Probe for yarn and install it when missing or broken.
    ///
    /// Returns the probe status after any install, and whether an install
    /// happened.
    fn ensure_installed(&self, ui: &mut dyn UserInterface) -> Result<(ProbeStatus, bool)> {
        let status = requirements::probe(self.runner, &self.config.working_dir);

        match status {
            ProbeStatus::Installed(installation) => {
                ui.info(&format!(
                    "Yarn is already installed at: {}",
                    installation.path.display()
                ));
                Ok((ProbeStatus::Installed(installation), false))
            }
            not_installed => {
                if let ProbeStatus::Broken { .. } = not_installed {
                    ui.warning(&not_installed.describe());
                }
                ui.info("Yarn not installed. Installing...");
                requirements::install(self.runner, ui, &self.platform)?;

                let after = requirements::probe(self.runner, &self.config.working_dir);
                debug!("after install: {}", after.describe());
                Ok((after, true))
            }
        }
    }

    /// Show the version found by the probe.
    ///
    /// A yarn that still does not work after a successful install is fatal.
    fn report_version(
        &self,
        ui: &mut dyn UserInterface,
        status: ProbeStatus,
    ) -> Result<YarnInstallation> {
        ui.info("Yarn version:");
        ui.show_command(&requirements::version_command(&self.config.working_dir).printable());

        match status {
            ProbeStatus::Installed(installation) => {
                ui.message(&installation.version);
                Ok(installation)
            }
            other => Err(StepError::YarnUnavailable {
                message: format!("{} after installation", other.describe()),
            }),
        }
    }

    /// The user's yarn command.
    pub fn yarn_command(&self) -> NativeCommand {
        NativeCommand::new(YARN)
            .args(self.config.command.tokens())
            .current_dir(&self.config.working_dir)
    }

    /// Run the user's command, teeing its output.
    ///
    /// The captured output is inspected for known failures before a failed
    /// exit status becomes an error.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<()> {
        let command = self.yarn_command();
        ui.show_command(&command.printable());

        let result = self.runner.run_tee(&command)?;
        debug!(
            "yarn finished in {:?} with exit code {:?}",
            result.duration, result.exit_code
        );

        if !result.success {
            for pattern in patterns::match_failures(&result.output) {
                debug!("matched failure pattern {}", pattern.name);
                ui.message("");
                ui.warning(pattern.advice);
            }
        }

        result.check(&command).map(|_| ())
    }

    fn cache(&self, ui: &mut dyn UserInterface) -> Result<Vec<PathBuf>> {
        let paths = cache_dependencies(&self.config.working_dir, self.committer)?;
        ui.info(&format!(
            "Marked {} node_modules director{} for caching",
            paths.len(),
            if paths.len() == 1 { "y" } else { "ies" }
        ));
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EnvmanCache;
    use crate::config::ParsedCommand;
    use crate::shell::{InvocationMode, MockResponse, MockRunner};
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::path::Path;
    use tempfile::TempDir;

    const NETWORK_OUTPUT: &str = "info There appears to be trouble with your network connection. Retrying...\nerror An unexpected error occurred";

    #[derive(Default)]
    struct RecordingCommitter {
        fail: bool,
        committed: RefCell<Vec<Vec<PathBuf>>>,
    }

    impl CacheCommitter for RecordingCommitter {
        fn commit(&self, paths: &[PathBuf]) -> Result<()> {
            self.committed.borrow_mut().push(paths.to_vec());
            if self.fail {
                Err(StepError::CacheCommit {
                    message: "envman not found".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn config(dir: &Path, command: &[&str], args: &[&str], use_cache: bool) -> Config {
        Config {
            working_dir: dir.to_path_buf(),
            raw_command: command.join(" "),
            raw_args: args.join(" "),
            command: ParsedCommand::new(
                command.iter().map(|s| s.to_string()).collect(),
                args.iter().map(|s| s.to_string()).collect(),
            ),
            use_cache,
            debug_log: false,
        }
    }

    fn ubuntu() -> Platform {
        Platform {
            os: "linux".into(),
            ubuntu: true,
            elevated: true,
            npm: None,
        }
    }

    fn macos_without_npm() -> Platform {
        Platform {
            os: "macos".into(),
            ubuntu: false,
            elevated: false,
            npm: None,
        }
    }

    fn installed_runner() -> MockRunner {
        MockRunner::new()
            .with_program("yarn", "/usr/bin/yarn")
            .succeed("yarn --version", "1.22.19\n")
    }

    fn apt_line() -> String {
        requirements::InstallStrategy::Apt { sudo: false }
            .command()
            .printable()
    }

    #[test]
    fn installed_yarn_skips_installer() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path(), &["install"], &[], false);
        let runner = installed_runner();
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let outcome = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap();

        assert!(!outcome.freshly_installed);
        assert_eq!(outcome.installation.version, "1.22.19");
        assert_eq!(runner.commands(), vec!["yarn --version", "yarn install"]);
        assert!(ui.has_info("already installed at: /usr/bin/yarn"));
        assert!(ui.messages().contains(&"1.22.19".to_string()));
    }

    #[test]
    fn missing_yarn_is_installed_then_used() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path(), &["run", "build"], &[], false);
        let runner = MockRunner::new()
            .installs(&apt_line(), "yarn", "/usr/bin/yarn")
            .succeed("yarn --version", "1.22.22");
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let outcome = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap();

        assert!(outcome.freshly_installed);
        assert_eq!(
            runner.commands(),
            vec![apt_line(), "yarn --version".to_string(), "yarn run build".to_string()]
        );
        assert!(ui.has_info("Yarn not installed. Installing..."));
    }

    #[test]
    fn failed_install_never_runs_command() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path(), &["install"], &[], true);
        let runner = MockRunner::new().fail(&apt_line(), 100, "E: Unable to locate package");
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let failure = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap_err();

        assert_eq!(failure.phase, Phase::EnsureInstalled);
        assert!(failure.error.is_exit_status());
        assert!(!runner.ran("yarn install"));
        assert!(committer.committed.borrow().is_empty());
    }

    #[test]
    fn unsupported_platform_fails_before_running() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path(), &["install"], &[], false);
        let runner = MockRunner::new();
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let failure = YarnStep::new(&config, &runner, &committer, macos_without_npm())
            .run(&mut ui)
            .unwrap_err();

        assert_eq!(failure.phase, Phase::EnsureInstalled);
        assert!(matches!(
            failure.error,
            StepError::UnsupportedPlatform { .. }
        ));
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn unusable_yarn_after_install_is_fatal() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path(), &["install"], &[], false);
        // Installer succeeds but yarn never shows up on PATH.
        let runner = MockRunner::new();
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let failure = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap_err();

        assert_eq!(failure.phase, Phase::ReportVersion);
        assert!(matches!(failure.error, StepError::YarnUnavailable { .. }));
        assert!(!runner.ran("yarn install"));
    }

    #[test]
    fn broken_yarn_is_reinstalled() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path(), &["install"], &[], false);
        let runner = MockRunner::new()
            .with_program("yarn", "/usr/bin/yarn")
            .fail("yarn --version", 1, "segfault");
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let failure = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap_err();

        assert!(runner.ran(&apt_line()));
        assert!(ui.has_warning("segfault"));
        assert_eq!(failure.phase, Phase::ReportVersion);
    }

    #[test]
    fn command_runs_teed_in_working_directory() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path(), &["run", "build"], &["--prod", "a b"], false);
        let runner = installed_runner();
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap();

        let invocation = runner.invocations().pop().unwrap();
        assert_eq!(invocation.command, "yarn run build --prod 'a b'");
        assert_eq!(invocation.mode, InvocationMode::Tee);
        assert_eq!(invocation.cwd.as_deref(), Some(temp.path()));
        assert!(ui.commands().contains(&"yarn run build --prod 'a b'".to_string()));
    }

    #[test]
    fn network_failure_emits_advisory_then_fails() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path(), &["install"], &[], true);
        let runner = installed_runner().fail("yarn install", 1, NETWORK_OUTPUT);
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let failure = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap_err();

        assert_eq!(failure.phase, Phase::Execute);
        assert!(matches!(
            failure.error,
            StepError::ExitStatus { code: Some(1), .. }
        ));
        assert!(ui.has_warning("--network-timeout"));
        assert!(committer.committed.borrow().is_empty());
    }

    #[test]
    fn other_failures_have_no_network_advisory() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path(), &["run", "lint"], &[], false);
        let runner = installed_runner().fail("yarn run lint", 2, "error Command failed.");
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let failure = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap_err();

        assert_eq!(failure.phase, Phase::Execute);
        assert!(!ui.has_warning("network"));
    }

    #[test]
    fn spawn_failure_of_command_is_fatal() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path(), &["install"], &[], false);
        let runner = installed_runner().on("yarn install", MockResponse::SpawnError);
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let failure = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap_err();

        assert!(matches!(failure.error, StepError::Spawn { .. }));
        assert!(failure.to_string().starts_with("run yarn command:"));
    }

    #[test]
    fn install_with_cache_enabled_scans_and_commits() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("node_modules/pkg/node_modules")).unwrap();
        std::fs::create_dir_all(temp.path().join("packages/app/node_modules")).unwrap();
        let config = config(temp.path(), &["install"], &["--frozen-lockfile"], true);
        let runner = installed_runner();
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let outcome = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap();

        let expected = vec![
            temp.path().join("node_modules"),
            temp.path().join("packages/app/node_modules"),
        ];
        assert_eq!(outcome.cached_paths, Some(expected.clone()));
        assert_eq!(committer.committed.borrow().as_slice(), [expected]);
        assert!(ui.has_info("Marked 2 node_modules directories"));
    }

    #[test]
    fn bare_yarn_counts_as_install() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path(), &[], &[], true);
        let runner = installed_runner();
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let outcome = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap();

        assert_eq!(outcome.cached_paths, Some(vec![]));
        assert_eq!(committer.committed.borrow().len(), 1);
    }

    #[test]
    fn other_subcommands_do_not_cache() {
        let temp = TempDir::new().unwrap();
        let config = config(temp.path(), &["run", "build"], &[], true);
        let runner = installed_runner();
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let outcome = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap();

        assert!(outcome.cached_paths.is_none());
        assert!(committer.committed.borrow().is_empty());
    }

    #[test]
    fn cache_disabled_never_scans() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("node_modules")).unwrap();
        let config = config(temp.path(), &["install"], &[], false);
        let runner = installed_runner();
        let committer = RecordingCommitter::default();
        let mut ui = MockUI::new();

        let outcome = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap();

        assert!(outcome.cached_paths.is_none());
        assert!(committer.committed.borrow().is_empty());
    }

    #[test]
    fn cache_commit_failure_is_only_a_warning() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("node_modules")).unwrap();
        let config = config(temp.path(), &["install"], &[], true);
        let runner = installed_runner();
        let committer = RecordingCommitter {
            fail: true,
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let outcome = YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap();

        assert!(outcome.cached_paths.is_none());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(ui.has_warning("Failed to cache node_modules"));
    }

    #[test]
    fn envman_committer_runs_after_command() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("node_modules")).unwrap();
        let config = config(temp.path(), &["install"], &[], true);
        let runner = installed_runner();
        let committer = EnvmanCache::with_existing(&runner, None);
        let mut ui = MockUI::new();

        YarnStep::new(&config, &runner, &committer, ubuntu())
            .run(&mut ui)
            .unwrap();

        let commands = runner.commands();
        assert_eq!(commands[1], "yarn install");
        assert!(commands[2].starts_with("envman add --key BITRISE_CACHE_INCLUDE_PATHS"));
    }
}
