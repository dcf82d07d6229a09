//! Shell-style argument splitting and quoting.

use crate::error::{Result, StepError};

/// Split a free-form, shell-quoted string into arguments.
///
/// Single quotes, double quotes and backslash escapes are honoured the way
/// a POSIX shell would; no expansion is performed. An empty or blank input
/// yields no arguments.
pub fn split(input: &str) -> Result<Vec<String>> {
    shell_words::split(input).map_err(|e| StepError::Config {
        message: format!("failed to split command arguments {:?}: {}", input, e),
    })
}

/// Render a program and its arguments as a single, re-quoted line.
pub fn printable_command<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    let words = std::iter::once(program).chain(args.iter().map(AsRef::as_ref));
    shell_words::join(words)
}
