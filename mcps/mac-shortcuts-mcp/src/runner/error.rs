//! Error types for running shortcuts
//!
//! A shortcut that exits non-zero or times out is not an error here; those
//! outcomes are reported in the [`ExecutionResult`](crate::ExecutionResult).
//! These variants cover runs that could not be attempted or were abandoned.

use thiserror::Error;

/// Errors that can occur when running a shortcut
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The shortcuts CLI is not installed or not on the search path
    #[error(
        "The '{program}' command line tool is not available. \
         Install the Shortcuts CLI on macOS and ensure it is on PATH."
    )]
    Unavailable {
        /// Program name that was searched for
        program: String,
    },

    /// The OS refused to start the process
    #[error("Unable to start the '{program}' command line tool: {source}")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the running process failed
    #[error("failed to wait for the shortcut process: {0}")]
    Wait(#[from] std::io::Error),

    /// The caller went away before the shortcut finished
    #[error("shortcut run was cancelled")]
    Cancelled,
}

/// Result type alias for runner operations
pub type RunnerResult<T> = Result<T, RunnerError>;
