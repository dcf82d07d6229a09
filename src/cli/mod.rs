//! Command-line interface for yarn-step.
//!
//! - [`args`] - Input definitions using clap derive macros

pub mod args;

pub use args::{Cli, Toggle};
