//! Step configuration.
//!
//! Inputs arrive as environment variables (or the equivalent flags, see
//! [`crate::cli::Cli`]) and are validated once at startup:
//! - Configuration types in [`schema`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use yarn_step::cli::{Cli, Toggle};
//! use yarn_step::config::validate;
//!
//! let cli = Cli {
//!     workdir: ".".into(),
//!     command: "install".into(),
//!     args: "--frozen-lockfile".into(),
//!     cache_local_deps: Toggle::Yes,
//!     verbose_log: Toggle::No,
//! };
//! let config = validate(&cli).unwrap();
//! assert!(config.should_cache());
//! ```

pub mod schema;
pub mod validator;

pub use schema::{Config, ParsedCommand, INSTALL_SUBCOMMAND};
pub use validator::{validate, validate_working_dir};
