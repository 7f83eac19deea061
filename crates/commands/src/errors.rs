//! Error types for the bot domain.
//!
//! Only genuine faults are errors. Authorization refusals and unmet
//! preconditions are ordinary [`crate::Outcome`]s and never appear here.

use thiserror::Error;

// ---------------------------------------------------------------------------
// RepoClient errors
// ---------------------------------------------------------------------------

/// A failed call through [`crate::RepoClient`].
///
/// Produced by infrastructure adapters. The router does not recover from these;
/// they propagate to the process boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoClientError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("{operation} request failed: {message}")]
    Transport {
        /// Short name of the attempted operation (e.g. `"create comment"`).
        operation: String,
        message: String,
    },

    /// The service answered with a non-success status code.
    #[error("{operation} failed with status {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        /// Response body, truncated by the adapter.
        body: String,
    },

    /// A success response could not be decoded into the expected shape.
    #[error("failed to decode {operation} response: {message}")]
    Decode { operation: String, message: String },
}

// ---------------------------------------------------------------------------
// Router errors
// ---------------------------------------------------------------------------

/// One failed step of a multi-step action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    /// What the step was aimed at (a repository name or a workflow run id).
    pub target: String,
    pub error: RepoClientError,
}

/// Errors returned by [`crate::CommandRouter::handle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// A single-step action failed.
    #[error(transparent)]
    Client(#[from] RepoClientError),

    /// A multi-step action ran every step but some of them failed.
    ///
    /// Completed steps are not undone.
    #[error("{action}: {} of {attempted} step(s) failed ({})", .failures.len(), failed_targets(.failures))]
    Incomplete {
        /// Human-readable name of the action (e.g. `"sdk issue fanout"`).
        action: String,
        /// Number of steps attempted.
        attempted: usize,
        failures: Vec<StepFailure>,
    },
}

fn failed_targets(failures: &[StepFailure]) -> String {
    failures
        .iter()
        .map(|f| f.target.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// The bot configuration is invalid.
///
/// Produced at load time; the bot never handles an event with an invalid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("configuration field '{field}' is invalid: {message}")]
    Invalid {
        /// Name of the offending configuration key.
        field: &'static str,
        message: String,
    },
}
