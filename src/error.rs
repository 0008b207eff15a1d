//! Error types for datalake-client
//!
//! A single [`Error`] enum covers every fatal condition the client can hit.
//! Conditions the retrieval protocol recovers from locally (failed submission,
//! not-ready probes, transport errors while polling) never surface here; they
//! are logged and folded into neutral outcomes instead.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for datalake-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for datalake-client
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The setting that caused the error (e.g., "query", "polling.max_retries")
        key: Option<String>,
    },

    /// The result never became available within the retry budget
    #[error("retrieval timed out after {attempts} attempts (~{}s waited)", .waited.as_secs())]
    RetrievalTimedOut {
        /// Number of probes issued before giving up
        attempts: u32,
        /// Total time spent sleeping between probes
        waited: Duration,
    },

    /// Writing the downloaded result to disk failed
    #[error("failed to write {}: {source}", .path.display())]
    Output {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error raised by a [`PostDownloadHook`](crate::hooks::PostDownloadHook)
    ///
    /// The client itself reports output failures as [`Error::Output`]; this
    /// variant lets hook implementations propagate their own I/O errors with `?`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Post-download hook failed after the file was written
    #[error("post-download hook '{hook}' failed: {message}")]
    Hook {
        /// Name of the hook that failed
        hook: String,
        /// Failure description
        message: String,
    },
}

impl Error {
    /// Shorthand for building a [`Error::Config`] tied to a specific setting
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// Trait for converting errors to process exit codes
///
/// The binary uses this so that a timeout is distinguishable from a bad
/// invocation and from any other failure.
pub trait ToExitCode {
    /// Get the process exit code for this error
    fn exit_code(&self) -> u8;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToExitCode for Error {
    fn exit_code(&self) -> u8 {
        match self {
            // Bad invocation, nothing was sent
            Error::Config { .. } => 2,

            // Retry budget exhausted
            Error::RetrievalTimedOut { .. } => 3,

            Error::Output { .. } | Error::Io(_) | Error::Hook { .. } => 1,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::RetrievalTimedOut { .. } => "retrieval_timed_out",
            Error::Output { .. } => "output_error",
            Error::Io(_) => "io_error",
            Error::Hook { .. } => "hook_error",
        }
    }
}
