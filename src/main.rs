//! yarn-step CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use yarn_step::cache::EnvmanCache;
use yarn_step::cli::Cli;
use yarn_step::config;
use yarn_step::error::{InPhase, Phase, RunFailure, StepError};
use yarn_step::requirements::Platform;
use yarn_step::runner::YarnStep;
use yarn_step::shell::SystemRunner;
use yarn_step::ui::{TerminalUI, UserInterface};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `verbose_log=yes` sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("yarn_step=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("yarn_step=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let mut ui = TerminalUI::new();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let failure = RunFailure::new(
                Phase::ParseConfig,
                StepError::Config {
                    message: e.to_string().trim().to_string(),
                },
            );
            ui.error(&failure.to_string());
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.verbose_log.is_yes());

    tracing::debug!("yarn-step starting with inputs: {:?}", cli);

    let config = match config::validate(&cli).in_phase(Phase::ParseConfig) {
        Ok(config) => config,
        Err(failure) => {
            ui.error(&failure.to_string());
            return ExitCode::FAILURE;
        }
    };
    ui.show_settings("Configs:", &config.summary());

    let runner = SystemRunner;
    let committer = EnvmanCache::new(&runner);
    let platform = Platform::detect(&runner);
    let step = YarnStep::new(&config, &runner, &committer, platform);

    match step.run(&mut ui) {
        Ok(outcome) => {
            tracing::debug!("step finished in {:?}", outcome.duration);
            ExitCode::SUCCESS
        }
        Err(failure) => {
            ui.error(&failure.to_string());
            ExitCode::FAILURE
        }
    }
}
