//! Error types for yarn-step operations.
//!
//! This module defines [`StepError`], the error type used throughout the
//! step, [`RunFailure`] which tags a fatal error with the phase it occurred
//! in, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every fatal error aborts the run immediately; nothing is retried
//! - Cache errors are reported as warnings and never fail the run
//! - All errors should provide actionable messages for users

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for yarn-step operations.
#[derive(Debug, Error)]
pub enum StepError {
    /// Malformed or missing input.
    #[error("Invalid input: {message}")]
    Config { message: String },

    /// A native command could not be started.
    #[error("Failed to run command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A native command ran but reported failure.
    #[error("Command `{command}` failed with exit code {}", display_code(.code))]
    ExitStatus { command: String, code: Option<i32> },

    /// No installation strategy exists for this machine.
    #[error("Unsupported platform: {message}")]
    UnsupportedPlatform { message: String },

    /// Yarn could not be used after installation.
    #[error("Yarn is not usable: {message}")]
    YarnUnavailable { message: String },

    /// Walking the working directory for node_modules failed.
    #[error("Failed to find node_modules directories under {}: {message}", .root.display())]
    Scan { root: PathBuf, message: String },

    /// Marking directories for the CI cache failed.
    #[error("Failed to mark node_modules directories to be cached: {message}")]
    CacheCommit { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

impl StepError {
    /// Whether the error came from a command that started and then failed.
    pub fn is_exit_status(&self) -> bool {
        matches!(self, StepError::ExitStatus { .. })
    }
}

/// Result type alias for yarn-step operations.
pub type Result<T> = std::result::Result<T, StepError>;

/// Phases of a step run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ParseConfig,
    EnsureInstalled,
    ReportVersion,
    Execute,
    ConditionalCache,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::ParseConfig => "parse config",
            Phase::EnsureInstalled => "ensure yarn installed",
            Phase::ReportVersion => "report yarn version",
            Phase::Execute => "run yarn command",
            Phase::ConditionalCache => "cache node_modules",
        };
        f.write_str(name)
    }
}

/// A fatal error together with the phase that produced it.
#[derive(Debug, Error)]
#[error("{phase}: {error}")]
pub struct RunFailure {
    pub phase: Phase,
    #[source]
    pub error: StepError,
}

impl RunFailure {
    pub fn new(phase: Phase, error: StepError) -> Self {
        Self { phase, error }
    }
}

/// Attach a [`Phase`] to a fallible result.
pub trait InPhase<T> {
    fn in_phase(self, phase: Phase) -> std::result::Result<T, RunFailure>;
}

impl<T> InPhase<T> for Result<T> {
    fn in_phase(self, phase: Phase) -> std::result::Result<T, RunFailure> {
        self.map_err(|error| RunFailure::new(phase, error))
    }
}
