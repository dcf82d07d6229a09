//! Mock command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without spawning processes.
//! Responses are keyed by the printable command line; every invocation is
//! recorded for later assertion.
//!
//! # Example
//!
//! ```
//! use yarn_step::shell::{CommandRunner, MockRunner, NativeCommand};
//!
//! let runner = MockRunner::new()
//!     .with_program("yarn", "/usr/bin/yarn")
//!     .succeed("yarn --version", "1.22.22\n");
//!
//! let result = runner.output(&NativeCommand::new("yarn").arg("--version")).unwrap();
//! assert_eq!(result.output.trim(), "1.22.22");
//! assert!(runner.ran("yarn --version"));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, StepError};

use super::command::{CommandResult, CommandRunner, NativeCommand};

/// Canned response for a command line.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// The process ran and exited with `code`, printing `output`.
    Exit { code: i32, output: String },
    /// The process could not be started.
    SpawnError,
}

/// How a command was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    Run,
    Output,
    Tee,
}

/// A recorded invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: String,
    pub cwd: Option<PathBuf>,
    pub mode: InvocationMode,
}

/// Mock runner implementation for testing.
#[derive(Debug, Default)]
pub struct MockRunner {
    programs: RefCell<HashMap<String, PathBuf>>,
    responses: HashMap<String, MockResponse>,
    /// Programs that become resolvable once the keyed command succeeds.
    provides: HashMap<String, (String, PathBuf)>,
    invocations: RefCell<Vec<Invocation>>,
}

impl MockRunner {
    /// Create a runner where nothing is on PATH and every command succeeds
    /// silently.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program` resolvable at `path`.
    pub fn with_program(self, program: &str, path: impl Into<PathBuf>) -> Self {
        self.programs
            .borrow_mut()
            .insert(program.to_string(), path.into());
        self
    }

    /// Respond to `command` with `response`.
    pub fn on(mut self, command: &str, response: MockResponse) -> Self {
        self.responses.insert(command.to_string(), response);
        self
    }

    /// Respond to `command` with success and the given output.
    pub fn succeed(self, command: &str, output: &str) -> Self {
        self.on(
            command,
            MockResponse::Exit {
                code: 0,
                output: output.to_string(),
            },
        )
    }

    /// Respond to `command` with a nonzero exit and the given output.
    pub fn fail(self, command: &str, code: i32, output: &str) -> Self {
        self.on(
            command,
            MockResponse::Exit {
                code,
                output: output.to_string(),
            },
        )
    }

    /// When `command` succeeds, make `program` resolvable at `path`.
    pub fn installs(mut self, command: &str, program: &str, path: impl Into<PathBuf>) -> Self {
        self.provides
            .insert(command.to_string(), (program.to_string(), path.into()));
        self
    }

    /// All recorded invocations, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Printable command lines of all invocations, in order.
    pub fn commands(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(|i| i.command.clone())
            .collect()
    }

    /// Whether `command` was invoked.
    pub fn ran(&self, command: &str) -> bool {
        self.invocations.borrow().iter().any(|i| i.command == command)
    }

    fn respond(&self, command: &NativeCommand, mode: InvocationMode) -> Result<CommandResult> {
        let line = command.printable();
        self.invocations.borrow_mut().push(Invocation {
            command: line.clone(),
            cwd: command.cwd().map(PathBuf::from),
            mode,
        });

        let response = self.responses.get(&line).cloned().unwrap_or(MockResponse::Exit {
            code: 0,
            output: String::new(),
        });

        match response {
            MockResponse::SpawnError => Err(StepError::Spawn {
                command: line,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock spawn failure"),
            }),
            MockResponse::Exit { code: 0, output } => {
                if let Some((program, path)) = self.provides.get(&line) {
                    self.programs
                        .borrow_mut()
                        .insert(program.clone(), path.clone());
                }
                Ok(CommandResult::success(output, Duration::ZERO))
            }
            MockResponse::Exit { code, output } => {
                Ok(CommandResult::failure(Some(code), output, Duration::ZERO))
            }
        }
    }
}

impl CommandRunner for MockRunner {
    fn which(&self, program: &str) -> Option<PathBuf> {
        self.programs.borrow().get(program).cloned()
    }

    fn run(&self, command: &NativeCommand) -> Result<()> {
        self.respond(command, InvocationMode::Run)?
            .check(command)
            .map(|_| ())
    }

    fn output(&self, command: &NativeCommand) -> Result<CommandResult> {
        self.respond(command, InvocationMode::Output)
    }

    fn run_tee(&self, command: &NativeCommand) -> Result<CommandResult> {
        self.respond(command, InvocationMode::Tee)
    }
}
