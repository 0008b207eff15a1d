//! Query client: submission followed by retrieval
//!
//! [`QueryClient`] owns one HTTP client shared by the [`RequestSubmitter`] and
//! the [`ResultRetriever`], and drives a single query from submission to the
//! downloaded file.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hooks::{NoOpHook, PostDownloadHook};
use crate::progress::ProgressReporter;
use crate::retrieve::ResultRetriever;
use crate::retry::Sleeper;
use crate::submit::RequestSubmitter;
use crate::types::{Operation, QuerySpec, RunOutcome};
use std::sync::Arc;
use tracing::{info, warn};

/// Runs queries against the datalake query service
///
/// # Example
///
/// ```no_run
/// use datalake_client::{Config, QueryClient, QuerySpec, RunOutcome};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = QueryClient::new(Config::default())?;
///     let spec = QuerySpec::new("select * from trips limit 100", "query", "result.parquet")?;
///
///     match client.run(&spec).await? {
///         RunOutcome::Downloaded { path, bytes, .. } => {
///             println!("wrote {bytes} bytes to {}", path.display());
///         }
///         RunOutcome::NoHandle => println!("query was not accepted"),
///     }
///     Ok(())
/// }
/// ```
pub struct QueryClient {
    submitter: RequestSubmitter,
    retriever: ResultRetriever,
    hook: Arc<dyn PostDownloadHook>,
}

impl QueryClient {
    /// Build a client from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or the HTTP
    /// client cannot be created.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().user_agent(config.service.user_agent.clone());
        if let Some(timeout) = config.service.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| {
            Error::config("service", format!("failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            submitter: RequestSubmitter::new(http_client.clone(), config.service.query_endpoint()),
            retriever: ResultRetriever::new(http_client, config.polling)?,
            hook: Arc::new(NoOpHook),
        })
    }

    /// Replace the sleeper used between probes
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.retriever = self.retriever.with_sleeper(sleeper);
        self
    }

    /// Replace the download progress reporter
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.retriever = self.retriever.with_progress(progress);
        self
    }

    /// Install a hook that runs after a successful download
    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn PostDownloadHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Run one query to completion
    ///
    /// Returns [`RunOutcome::NoHandle`] when submission failed; that case is
    /// logged but not treated as an error.
    ///
    /// # Errors
    ///
    /// - [`Error::RetrievalTimedOut`] when the result never became ready
    /// - [`Error::Output`] when the result could not be written
    /// - [`Error::Hook`] when the post-download hook failed
    pub async fn run(&self, spec: &QuerySpec) -> Result<RunOutcome> {
        match spec.operation() {
            Operation::Query => self.run_query(spec).await,
        }
    }

    async fn run_query(&self, spec: &QuerySpec) -> Result<RunOutcome> {
        let Some(handle) = self.submitter.submit(spec.query()).await else {
            warn!(
                endpoint = %self.submitter.endpoint(),
                "no result handle received, nothing to download"
            );
            return Ok(RunOutcome::NoHandle);
        };

        let retrieval = self.retriever.retrieve(&handle, spec.output()).await?;

        info!(hook = self.hook.name(), "running post-download hook");
        self.hook
            .on_downloaded(spec.output(), retrieval.bytes)
            .await?;

        Ok(RunOutcome::Downloaded {
            path: spec.output().to_path_buf(),
            bytes: retrieval.bytes,
            attempts: retrieval.attempts,
        })
    }
}
