//! Result polling and download
//!
//! [`ResultRetriever`] turns a [`ResultHandle`] into a local file. Each probe
//! is a streaming `GET` against the handle URL:
//!
//! - `200 OK` with a non-zero `Content-Length` means the result is ready; the
//!   body is streamed to the output path, which is truncated first.
//! - `200 OK` with `Content-Length: 0` (or none), or any other status, means
//!   the backend is still computing.
//! - A transport error, on the request or mid-body, is logged and treated as
//!   not ready.
//!
//! Every not-ready probe costs one retry cycle. Running out of cycles is the
//! only retrieval failure surfaced to the caller, apart from local I/O errors
//! on the output file.

use crate::config::PollConfig;
use crate::error::{Error, Result};
use crate::progress::{NoProgress, ProgressReporter};
use crate::retry::{Sleeper, TokioSleeper, poll_with_budget};
use crate::types::{ProbeOutcome, ResultHandle, Retrieval};
use futures::StreamExt;
use reqwest::StatusCode;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

/// How a body stream ended
enum StreamEnd {
    Complete(u64),
    Interrupted { written: u64, error: reqwest::Error },
}

/// Polls a result handle and downloads the result once it is ready
pub struct ResultRetriever {
    http_client: reqwest::Client,
    config: PollConfig,
    sleeper: Arc<dyn Sleeper>,
    progress: Arc<dyn ProgressReporter>,
}

impl ResultRetriever {
    /// Create a retriever that sleeps with tokio and reports no progress
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `config` allows no probes or has a zero
    /// chunk size.
    pub fn new(http_client: reqwest::Client, config: PollConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http_client,
            config,
            sleeper: Arc::new(TokioSleeper),
            progress: Arc::new(NoProgress),
        })
    }

    /// Replace the inter-probe sleeper
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Replace the download progress reporter
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Polling settings in effect
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Poll `handle` until the result downloads to `output` or the budget runs out
    ///
    /// # Errors
    ///
    /// - [`Error::RetrievalTimedOut`] after `max_retries` not-ready probes
    /// - [`Error::Output`] if the output file cannot be created or written
    pub async fn retrieve(&self, handle: &ResultHandle, output: &Path) -> Result<Retrieval> {
        info!(
            max_retries = self.config.max_retries,
            interval_secs = self.config.interval.as_secs(),
            worst_case_secs = self.config.worst_case_wait().as_secs(),
            "waiting for result"
        );

        let (bytes, attempts) =
            poll_with_budget(&self.config, self.sleeper.as_ref(), move |attempt| async move {
                debug!(attempt, "probing result");
                match self.try_download(handle, output).await? {
                    ProbeOutcome::Downloaded { bytes } => Ok(Some(bytes)),
                    ProbeOutcome::NotReady => Ok(None),
                }
            })
            .await?;

        Ok(Retrieval { bytes, attempts })
    }

    /// Issue a single probe and download the result if it is ready
    ///
    /// Transport errors are logged and reported as [`ProbeOutcome::NotReady`].
    pub async fn try_download(&self, handle: &ResultHandle, output: &Path) -> Result<ProbeOutcome> {
        let response = match self.http_client.get(handle.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "download failed");
                return Ok(ProbeOutcome::NotReady);
            }
        };

        let status = response.status();
        let declared = response.content_length().unwrap_or(0);
        if status != StatusCode::OK || declared == 0 {
            info!(
                status = status.as_u16(),
                content_length = declared,
                "backend still processing"
            );
            return Ok(ProbeOutcome::NotReady);
        }

        self.stream_to_file(response, declared, output).await
    }

    async fn stream_to_file(
        &self,
        response: reqwest::Response,
        declared: u64,
        output: &Path,
    ) -> Result<ProbeOutcome> {
        // create() truncates, so every attempt rewrites the file from byte 0
        let mut file = tokio::fs::File::create(output)
            .await
            .map_err(|source| Error::Output {
                path: output.to_path_buf(),
                source,
            })?;

        let label = output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| output.display().to_string());
        self.progress.start(declared, &label);
        let end = self.write_body(response, &mut file, output).await;
        self.progress.finish();

        match end? {
            StreamEnd::Complete(written) if written == declared => {
                info!(path = %output.display(), bytes = written, "downloaded result file");
                Ok(ProbeOutcome::Downloaded { bytes: written })
            }
            StreamEnd::Complete(written) => {
                warn!(
                    path = %output.display(),
                    written,
                    declared,
                    "body length did not match Content-Length"
                );
                Ok(ProbeOutcome::NotReady)
            }
            StreamEnd::Interrupted { written, error } => {
                error!(error = %error, written, declared, "download failed");
                Ok(ProbeOutcome::NotReady)
            }
        }
    }

    async fn write_body(
        &self,
        response: reqwest::Response,
        file: &mut tokio::fs::File,
        output: &Path,
    ) -> Result<StreamEnd> {
        let output_error = |source| Error::Output {
            path: output.to_path_buf(),
            source,
        };

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(item) = stream.next().await {
            let bytes = match item {
                Ok(bytes) => bytes,
                Err(error) => return Ok(StreamEnd::Interrupted { written, error }),
            };
            for piece in bytes.chunks(self.config.chunk_size) {
                file.write_all(piece).await.map_err(output_error)?;
                written += piece.len() as u64;
                self.progress.advance(piece.len() as u64);
            }
        }
        file.flush().await.map_err(output_error)?;

        Ok(StreamEnd::Complete(written))
    }
}
