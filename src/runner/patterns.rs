//! Known yarn failure messages.
//!
//! When the yarn command fails, its captured output is matched against
//! these patterns and every match is reported as an advisory before the
//! failure itself. Advisories never change the outcome.

/// Printed by yarn when a registry request failed and is being retried.
pub const NETWORK_RETRY_MESSAGE: &str =
    "There appears to be trouble with your network connection. Retrying...";

/// A recognised failure and what to tell the user about it.
#[derive(Debug)]
pub struct FailurePattern {
    /// Pattern name (for debugging).
    pub name: &'static str,
    /// Literal text searched for in the output.
    pub needle: &'static str,
    /// Advice shown when the text is found.
    pub advice: &'static str,
}

/// Built-in patterns, in reporting order.
pub const KNOWN_FAILURES: &[FailurePattern] = &[
    FailurePattern {
        name: "network_retry",
        needle: NETWORK_RETRY_MESSAGE,
        advice: "Looks like you've got network issues while installing yarn.\n\
                 Please try to increase the timeout with --registry https://registry.npmjs.org --network-timeout [NUMBER] command before using this step (recommended value is 100000).\n\
                 If issue still persists, please try to debug the error or reach out to support.",
    },
    FailurePattern {
        name: "integrity_check",
        needle: "integrity check failed",
        advice: "Yarn's integrity check failed; the node_modules folder may be stale.\n\
                 Try running `yarn install --check-files`, or disable cache_local_deps for one build to start from a clean node_modules.",
    },
];

/// Patterns whose text appears in `output`.
pub fn match_failures(output: &str) -> Vec<&'static FailurePattern> {
    KNOWN_FAILURES
        .iter()
        .filter(|pattern| output.contains(pattern.needle))
        .collect()
}
