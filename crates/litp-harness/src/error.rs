// crates/litp-harness/src/error.rs
// ============================================================================
// Module: Harness Errors
// Description: Error taxonomy for LITP harness operations.
// Purpose: Distinguish connectivity, command, REST, and expectation failures.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Harness failures fall into a small set of classes: the test configuration
//! was unusable, a remote command could not be issued, a command ran but
//! violated the caller's expectation, REST traffic failed, structured output
//! could not be parsed, or a bounded wait ran out of time. Suites usually
//! bubble these up with `?` and let the test runner report them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

// ============================================================================
// SECTION: Error Types
// ============================================================================

/// Errors raised by harness operations against the deployment under test.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The cluster configuration was missing or invalid.
    #[error("cluster configuration error: {0}")]
    Config(String),

    /// A remote command could not be spawned or transported.
    #[error("remote execution failed on {node}: {reason}")]
    Exec {
        /// Node filename the command targeted.
        node: String,
        /// Transport-level failure description.
        reason: String,
    },

    /// A command ran but violated the caller's stated expectation.
    #[error("command expectation failed on {node}: `{cmd}` rc={rc} stderr={stderr:?}")]
    Expectation {
        /// Node filename the command ran on.
        node: String,
        /// The full command line issued.
        cmd: String,
        /// Observed return code.
        rc: i32,
        /// Observed standard-error lines.
        stderr: Vec<String>,
    },

    /// A bounded operation exceeded its timeout.
    #[error("timed out after {timeout:?} waiting for {waiting_for}")]
    Timeout {
        /// Bound that was exceeded.
        timeout: Duration,
        /// Description of the awaited condition.
        waiting_for: String,
    },

    /// A REST request failed at the HTTP level.
    #[error("rest request failed: {0}")]
    Rest(String),

    /// Structured command or REST output could not be parsed.
    #[error("failed to parse {context}: {reason}")]
    Parse {
        /// What was being parsed (command, endpoint, file).
        context: String,
        /// Parser failure description.
        reason: String,
    },

    /// The model tree did not contain an expected path or type.
    #[error("model query returned nothing: {0}")]
    NotFound(String),
}

impl HarnessError {
    /// Builds an execution error for a node.
    pub fn exec(node: &str, reason: impl Into<String>) -> Self {
        Self::Exec {
            node: node.to_string(),
            reason: reason.into(),
        }
    }

    /// Builds a parse error with context.
    pub fn parse(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
            reason: reason.into(),
        }
    }
}
