//! Yarn requirement: detection and installation.
//!
//! - [`probe`] decides whether yarn is installed and usable
//! - [`installer`] installs it when it is not

pub mod installer;
pub mod probe;

pub use installer::{install, InstallStrategy, Platform};
pub use probe::{probe, version_command, ProbeStatus, YarnInstallation, YARN};
