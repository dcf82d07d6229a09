//! yarn-step - a CI build step that makes sure yarn is available, runs a
//! yarn command in a working directory, and marks `node_modules`
//! directories for the CI cache.
//!
//! # Modules
//!
//! - [`cache`] - node_modules discovery and cache hand-off
//! - [`cli`] - Input parsing (environment variables and flags)
//! - [`config`] - Input validation and the step configuration
//! - [`error`] - Error types and result aliases
//! - [`requirements`] - Yarn probing and installation
//! - [`runner`] - Step orchestration and failure advisories
//! - [`shell`] - Native command execution
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use yarn_step::cache::find_dependency_dirs;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! std::fs::create_dir_all(temp.path().join("a/node_modules/b/node_modules")).unwrap();
//!
//! let found = find_dependency_dirs(temp.path()).unwrap();
//! assert_eq!(found, vec![temp.path().join("a/node_modules")]);
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod requirements;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{Phase, Result, RunFailure, StepError};
