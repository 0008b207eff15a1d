//! # datalake-client
//!
//! Client for a datalake query service that answers asynchronously.
//!
//! A query is POSTed to `{base_url}/query`; the service replies at once with a
//! presigned URL where the Parquet result will appear once the backend has
//! computed it. The client then probes that URL at a fixed interval until it
//! serves a non-empty body, and streams the body to a local file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use datalake_client::{Config, QueryClient, QuerySpec};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.service.base_url = "https://api.example.com/prod".to_string();
//!
//!     let spec = QuerySpec::new(
//!         "select * from 's3://bucket/data/' limit 100",
//!         "query",
//!         "result.parquet",
//!     )?;
//!
//!     let outcome = QueryClient::new(config)?.run(&spec).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Failure model
//!
//! - Invalid input or configuration fails before any request is sent.
//! - A failed submission is logged and yields [`RunOutcome::NoHandle`].
//! - Not-ready probes and transport errors while polling each cost one retry.
//! - Running out of retries yields [`Error::RetrievalTimedOut`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Command-line argument definitions
pub mod cli;
/// Query client orchestration
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Post-download hooks
pub mod hooks;
/// Logging initialization
pub mod logging;
/// Download progress reporting
pub mod progress;
/// Result polling and download
pub mod retrieve;
/// Fixed-interval polling with a retry budget
pub mod retry;
/// Query submission
pub mod submit;
/// Core types
pub mod types;

#[cfg(test)]
mod test_helpers;

// Re-export commonly used types
pub use client::QueryClient;
pub use config::{Config, PollConfig, ServiceConfig};
pub use error::{Error, Result, ToExitCode};
pub use hooks::{NoOpHook, PostDownloadHook};
pub use progress::{BarProgress, NoProgress, ProgressReporter};
pub use retrieve::ResultRetriever;
pub use retry::{Sleeper, TokioSleeper};
pub use submit::RequestSubmitter;
pub use types::{Operation, ProbeOutcome, QuerySpec, ResultHandle, Retrieval, RunOutcome};
