//! Native command execution and platform helpers.

pub mod args;
pub mod command;
pub mod mock;
pub mod platform;

pub use args::{printable_command, split};
pub use command::{CommandResult, CommandRunner, NativeCommand, OutputLine, SystemRunner};
pub use mock::{Invocation, InvocationMode, MockResponse, MockRunner};
pub use platform::{has_lsb_release, is_elevated, os_name};
