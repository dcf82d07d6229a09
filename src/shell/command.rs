//! Native command execution.
//!
//! Commands are spawned directly (no intermediate shell) and waited on to
//! completion. A failure to start the process is reported as
//! [`StepError::Spawn`]; a process that ran and exited unsuccessfully is
//! reported as [`StepError::ExitStatus`].

use crate::error::{Result, StepError};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use super::args::printable_command;

/// A native command: program, arguments, and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCommand {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl NativeCommand {
    /// Create a command for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// The command line as a user would type it, quoted where needed.
    pub fn printable(&self) -> String {
        printable_command(&self.program, &self.args)
    }

    fn to_std(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> StepError {
        StepError::Spawn {
            command: self.printable(),
            source,
        }
    }
}

/// Result of a command that was started successfully.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Combined stdout and stderr, in arrival order.
    pub output: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(output: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            output,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, output: String, duration: Duration) -> Self {
        Self {
            exit_code,
            output,
            duration,
            success: false,
        }
    }

    /// Turn an unsuccessful result into [`StepError::ExitStatus`].
    pub fn check(self, command: &NativeCommand) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(StepError::ExitStatus {
                command: command.printable(),
                code: self.exit_code,
            })
        }
    }
}

/// A chunk of output read from a child process.
#[derive(Debug, Clone)]
pub enum OutputLine {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
}

/// Runs native commands.
///
/// This trait allows mocking process execution in tests.
pub trait CommandRunner {
    /// Resolve a program on the search path.
    fn which(&self, program: &str) -> Option<PathBuf>;

    /// Run with stdio inherited from this process.
    fn run(&self, command: &NativeCommand) -> Result<()>;

    /// Run silently, capturing combined output.
    ///
    /// Only spawn failures are returned as errors; inspect
    /// [`CommandResult::success`] for the exit status.
    fn output(&self, command: &NativeCommand) -> Result<CommandResult>;

    /// Run while copying output to the terminal and into the result buffer.
    ///
    /// Only spawn failures are returned as errors, so the captured output
    /// is available on every exit path.
    fn run_tee(&self, command: &NativeCommand) -> Result<CommandResult>;
}

/// [`CommandRunner`] backed by real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn run(&self, command: &NativeCommand) -> Result<()> {
        let start = Instant::now();
        let status = command
            .to_std()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| command.spawn_error(e))?;

        let result = if status.success() {
            CommandResult::success(String::new(), start.elapsed())
        } else {
            CommandResult::failure(status.code(), String::new(), start.elapsed())
        };
        result.check(command).map(|_| ())
    }

    fn output(&self, command: &NativeCommand) -> Result<CommandResult> {
        let start = Instant::now();
        let output = command
            .to_std()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| command.spawn_error(e))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(CommandResult::success(combined, start.elapsed()))
        } else {
            Ok(CommandResult::failure(
                output.status.code(),
                combined,
                start.elapsed(),
            ))
        }
    }

    fn run_tee(&self, command: &NativeCommand) -> Result<CommandResult> {
        let start = Instant::now();

        let mut child = command
            .to_std()
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| command.spawn_error(e))?;

        let (tx, rx) = mpsc::channel();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            let tx = tx.clone();
            readers.push(thread::spawn(move || {
                forward_lines(stdout, |chunk| tx.send(OutputLine::Stdout(chunk)).is_ok())
            }));
        }
        if let Some(stderr) = child.stderr.take() {
            let tx = tx.clone();
            readers.push(thread::spawn(move || {
                forward_lines(stderr, |chunk| tx.send(OutputLine::Stderr(chunk)).is_ok())
            }));
        }
        drop(tx);

        let mut buffer = Vec::new();
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        for line in rx {
            // Terminal write errors must not lose the captured output.
            match line {
                OutputLine::Stdout(chunk) => {
                    let mut out = stdout.lock();
                    let _ = out.write_all(&chunk).and_then(|_| out.flush());
                    buffer.extend_from_slice(&chunk);
                }
                OutputLine::Stderr(chunk) => {
                    let mut err = stderr.lock();
                    let _ = err.write_all(&chunk).and_then(|_| err.flush());
                    buffer.extend_from_slice(&chunk);
                }
            }
        }

        for reader in readers {
            let _ = reader.join();
        }

        let status = child.wait().map_err(|e| command.spawn_error(e))?;
        let output = String::from_utf8_lossy(&buffer).into_owned();

        if status.success() {
            Ok(CommandResult::success(output, start.elapsed()))
        } else {
            Ok(CommandResult::failure(status.code(), output, start.elapsed()))
        }
    }
}

/// Read `source` line by line, handing each raw line (with its newline) to
/// `send` until the stream ends or `send` returns false.
fn forward_lines<R: Read>(source: R, send: impl Fn(Vec<u8>) -> bool) {
    let mut reader = BufReader::new(source);
    loop {
        let mut chunk = Vec::new();
        match reader.read_until(b'\n', &mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                if !send(chunk) {
                    break;
                }
            }
        }
    }
}
