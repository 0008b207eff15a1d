//! Logging initialization
//!
//! Nothing is installed at load time; the binary calls [`init`] once after
//! parsing arguments. Library users may install their own subscriber instead.

use crate::error::{Error, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Logging settings taken from the command line
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Default level for every target (e.g. "info", "debug")
    pub level: String,
    /// Extra `EnvFilter` directives, e.g. "datalake_client=trace,reqwest=warn"
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            filter: None,
        }
    }
}

impl LoggingConfig {
    /// Build the `EnvFilter` for these settings
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unknown level.
    pub fn env_filter(&self) -> Result<EnvFilter> {
        let level: Level = self.level.parse().map_err(|_| {
            Error::config("log_level", format!("unknown log level: {}", self.level))
        })?;

        Ok(EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy(self.filter.as_deref().unwrap_or_default()))
    }
}

/// Install the global subscriber, writing to stderr
///
/// Stderr keeps log lines apart from the progress bar and any stdout output.
pub fn init(config: &LoggingConfig) -> Result<()> {
    init_with_writer(config, std::io::stderr)
}

/// Install the global subscriber with a custom writer
///
/// # Errors
///
/// Returns [`Error::Config`] if the level is invalid or a global subscriber
/// is already installed.
pub fn init_with_writer<W>(config: &LoggingConfig, writer: W) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .with_writer(writer)
        .with_target(true)
        .try_init()
        .map_err(|e| Error::config("log_level", format!("failed to initialize logging: {e}")))
}
