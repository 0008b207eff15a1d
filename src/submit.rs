//! Query submission
//!
//! Sends the SQL text to the query service and extracts the result handle
//! from the response. Every failure mode degrades to `None` after a log line,
//! so the caller has a single "nothing to retrieve" branch.

use crate::types::{ResultHandle, SubmitRequest, SubmitResponse};
use tracing::{debug, error, info, warn};

/// Submits queries to the service's query endpoint
#[derive(Clone, Debug)]
pub struct RequestSubmitter {
    http_client: reqwest::Client,
    endpoint: String,
}

impl RequestSubmitter {
    /// Create a submitter for `endpoint` (e.g. `https://api.example.com/query`)
    pub fn new(http_client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint this submitter posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit `query` and return the handle of its eventual result
    ///
    /// Never fails: transport errors, non-2xx statuses, unreadable bodies and
    /// bodies without a `result_parquet` field all yield `None`.
    pub async fn submit(&self, query: &str) -> Option<ResultHandle> {
        debug!(endpoint = %self.endpoint, "submitting query");

        let response = match self
            .http_client
            .post(&self.endpoint)
            .json(&SubmitRequest { query })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(endpoint = %self.endpoint, error = %e, "request error while submitting query");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                body = %body,
                "HTTP error while submitting query"
            );
            return None;
        }

        let body: SubmitResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                error!(endpoint = %self.endpoint, error = %e, "unreadable response from query service");
                return None;
            }
        };

        if let Some(json_url) = body.result_json.as_deref() {
            debug!(url = %json_url, "service also offered a JSON rendition");
        }

        match body.result_parquet {
            Some(url) if !url.trim().is_empty() => {
                info!("query accepted, waiting for result");
                Some(ResultHandle::new(url))
            }
            _ => {
                warn!(endpoint = %self.endpoint, "response did not include result_parquet");
                None
            }
        }
    }
}
