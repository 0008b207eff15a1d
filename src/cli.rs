//! Command-line argument definitions.

use crate::config::Config;
use crate::error::Result;
use crate::logging::LoggingConfig;
use crate::types::QuerySpec;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Datalake Client - submit a SQL query and download the Parquet result
#[derive(Parser, Debug)]
#[command(name = "datalake-client", author, version, about, long_about = None)]
pub struct Cli {
    /// Service operation to call (only "query" is supported)
    #[arg(short, long)]
    pub path: String,

    /// SQL query
    #[arg(short, long)]
    pub query: String,

    /// Output file path for download
    #[arg(short, long, default_value = "result.parquet")]
    pub output: PathBuf,

    /// Root URL of the query service
    #[arg(long, env = "DATALAKE_API_URL")]
    pub base_url: Option<String>,

    /// Maximum number of probes before giving up
    #[arg(long, env = "DATALAKE_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Seconds to wait between probes
    #[arg(long, env = "DATALAKE_POLL_INTERVAL")]
    pub poll_interval: Option<u64>,

    /// Largest write to the output file, in bytes
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Per-request timeout in seconds (default: none)
    #[arg(long)]
    pub request_timeout: Option<u64>,

    /// JSON configuration file; command-line flags take precedence
    #[arg(short, long, env = "DATALAKE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Additional log filter directives, e.g. "reqwest=debug"
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Do not draw a progress bar while downloading
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    /// Validate the query arguments
    pub fn query_spec(&self) -> Result<QuerySpec> {
        QuerySpec::new(&self.query, &self.path, self.output.clone())
    }

    /// Merge the optional config file with command-line overrides
    pub fn client_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.service.base_url = base_url.clone();
        }
        if let Some(secs) = self.request_timeout {
            config.service.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(max_retries) = self.max_retries {
            config.polling.max_retries = max_retries;
        }
        if let Some(secs) = self.poll_interval {
            config.polling.interval = Duration::from_secs(secs);
        }
        if let Some(chunk_size) = self.chunk_size {
            config.polling.chunk_size = chunk_size;
        }

        config.validate()?;
        Ok(config)
    }

    /// Logging settings
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            filter: self.log_filter.clone(),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::Operation;

    #[test]
    fn test_required_flags_and_default_output() {
        let cli = Cli::try_parse_from(["datalake-client", "-p", "query", "-q", "select 1"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("result.parquet"));

        let spec = cli.query_spec().unwrap();
        assert_eq!(spec.operation(), Operation::Query);
        assert_eq!(spec.query(), "select 1");
    }

    #[test]
    fn test_missing_required_flags_fail_to_parse() {
        assert!(Cli::try_parse_from(["datalake-client", "-q", "select 1"]).is_err());
        assert!(Cli::try_parse_from(["datalake-client", "-p", "query"]).is_err());
    }

    #[test]
    fn test_empty_query_is_config_error() {
        let cli = Cli::try_parse_from(["datalake-client", "--path", "query", "--query", ""]).unwrap();
        assert!(matches!(cli.query_spec(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("client.json");
        std::fs::write(
            &file,
            r#"{"service": {"base_url": "https://file.example.com"}, "polling": {"max_retries": 9, "interval": 2}}"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "datalake-client",
            "-p",
            "query",
            "-q",
            "select 1",
            "--config",
            file.to_str().unwrap(),
            "--base-url",
            "https://flag.example.com",
            "--poll-interval",
            "0",
            "--request-timeout",
            "30",
        ])
        .unwrap();

        let config = cli.client_config().unwrap();
        assert_eq!(config.service.base_url, "https://flag.example.com");
        assert_eq!(config.service.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.polling.max_retries, 9);
        assert_eq!(config.polling.interval, Duration::ZERO);
    }

    #[test]
    fn test_zero_retries_flag_is_rejected() {
        let cli = Cli::try_parse_from([
            "datalake-client",
            "-p",
            "query",
            "-q",
            "select 1",
            "--max-retries",
            "0",
        ])
        .unwrap();
        assert!(matches!(cli.client_config(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_logging_settings() {
        let cli = Cli::try_parse_from([
            "datalake-client",
            "-p",
            "query",
            "-q",
            "select 1",
            "--log-level",
            "debug",
            "--log-filter",
            "hyper=warn",
        ])
        .unwrap();
        let logging = cli.logging();
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.filter.as_deref(), Some("hyper=warn"));
    }
}
