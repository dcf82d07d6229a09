//! Step orchestration.

pub mod patterns;
pub mod workflow;

pub use patterns::{match_failures, FailurePattern, KNOWN_FAILURES, NETWORK_RETRY_MESSAGE};
pub use workflow::{StepOutcome, YarnStep};
