//! Core types for query submission and result retrieval

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Service operation selected with `--path`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Submit a SQL query and download its Parquet result
    Query,
}

impl Operation {
    /// Endpoint path segment for this operation
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Query => "query",
        }
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Err(Error::config("path", "path must be provided")),
            "query" => Ok(Operation::Query),
            other => Err(Error::config("path", format!("unsupported path: {other}"))),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP method used for submission
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitMethod {
    /// JSON body POSTed to the operation endpoint
    #[default]
    Post,
}

impl FromStr for SubmitMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" => Ok(SubmitMethod::Post),
            other => Err(Error::config(
                "method",
                format!("unsupported HTTP method: {other}"),
            )),
        }
    }
}

/// A validated query request
///
/// Built once from user input and never mutated. Construction fails with
/// [`Error::Config`] before any network activity if the query, path or output
/// is empty, or if the path/method is not supported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerySpec {
    query: String,
    operation: Operation,
    method: SubmitMethod,
    output: PathBuf,
}

impl QuerySpec {
    /// Validate user input into a query request using the default POST method
    ///
    /// # Examples
    ///
    /// ```
    /// use datalake_client::types::{Operation, QuerySpec};
    ///
    /// let spec = QuerySpec::new("select 1", "query", "result.parquet").unwrap();
    /// assert_eq!(spec.operation(), Operation::Query);
    ///
    /// assert!(QuerySpec::new("", "query", "result.parquet").is_err());
    /// assert!(QuerySpec::new("select 1", "", "result.parquet").is_err());
    /// ```
    pub fn new(query: &str, path: &str, output: impl Into<PathBuf>) -> Result<Self> {
        Self::with_method(query, path, "post", output)
    }

    /// Validate user input into a query request with an explicit HTTP method
    pub fn with_method(
        query: &str,
        path: &str,
        method: &str,
        output: impl Into<PathBuf>,
    ) -> Result<Self> {
        // Path is checked first so a missing selector is reported even when
        // the query is also missing
        let operation: Operation = path.parse()?;
        if query.trim().is_empty() {
            return Err(Error::config("query", "query must be provided"));
        }
        let method: SubmitMethod = method.parse()?;
        let output = output.into();
        if output.as_os_str().is_empty() {
            return Err(Error::config("output", "output path must be provided"));
        }

        Ok(Self {
            query: query.to_string(),
            operation,
            method,
            output,
        })
    }

    /// SQL text to submit
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Selected service operation
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Submission method
    pub fn method(&self) -> SubmitMethod {
        self.method
    }

    /// Local destination for the downloaded result
    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// Opaque URL where a computed result will eventually be downloadable
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResultHandle(String);

impl ResultHandle {
    /// Wrap a URL returned by the service
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request body for the query endpoint
#[derive(Clone, Debug, Serialize)]
pub struct SubmitRequest<'a> {
    /// SQL text
    pub query: &'a str,
}

/// Response body from the query endpoint
///
/// Both fields are optional on the wire; a response without `result_parquet`
/// means there is nothing to retrieve.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubmitResponse {
    /// Presigned URL of the Parquet result
    #[serde(default)]
    pub result_parquet: Option<String>,

    /// Presigned URL of the JSON rendition (used by the web UI)
    #[serde(default)]
    pub result_json: Option<String>,
}

/// Outcome of a single probe-and-download attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Result not available yet (or the probe failed in transit)
    NotReady,
    /// Result streamed to the output file
    Downloaded {
        /// Number of bytes written
        bytes: u64,
    },
}

/// Summary of a completed retrieval
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retrieval {
    /// Bytes written to the output file
    pub bytes: u64,
    /// Probes issued, including the successful one
    pub attempts: u32,
}

/// Terminal outcome of one client run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The result was downloaded to `path`
    Downloaded {
        /// Output file location
        path: PathBuf,
        /// Bytes written
        bytes: u64,
        /// Probes issued, including the successful one
        attempts: u32,
    },
    /// Submission failed; nothing was retrieved
    NoHandle,
}
