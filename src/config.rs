//! Configuration types for datalake-client

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Query service connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Root URL of the query service; the submission endpoint is `{base_url}/query`
    /// (default: "http://localhost:9000")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (None = HTTP client default, i.e. no timeout)
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ServiceConfig {
    /// Full URL of the query submission endpoint
    pub fn query_endpoint(&self) -> String {
        format!("{}/query", self.base_url.trim_end_matches('/'))
    }
}

/// Result polling configuration
///
/// The worst-case wait for a result is roughly `max_retries * interval`
/// (about 83 minutes with the defaults).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollConfig {
    /// Maximum number of probe cycles before giving up (default: 1000)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between probes (default: 5 seconds)
    #[serde(default = "default_interval", with = "duration_serde")]
    pub interval: Duration,

    /// Largest slice written to disk per write call, in bytes (default: 8192)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            interval: default_interval(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl PollConfig {
    /// Upper bound on the time spent waiting between probes
    pub fn worst_case_wait(&self) -> Duration {
        self.interval.saturating_mul(self.max_retries)
    }

    /// Reject settings that cannot drive a retrieval
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(Error::config(
                "polling.max_retries",
                "at least one probe must be allowed",
            ));
        }
        if self.chunk_size == 0 {
            return Err(Error::config(
                "polling.chunk_size",
                "chunk size must be positive",
            ));
        }
        Ok(())
    }
}

/// Top-level client configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Query service connection settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Result polling settings
    #[serde(default)]
    pub polling: PollConfig,
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(
                "config",
                format!("failed to read config file '{}': {}", path.display(), e),
            )
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            Error::config(
                "config",
                format!("invalid config file '{}': {}", path.display(), e),
            )
        })?;
        Ok(config)
    }

    /// Check that the configuration can drive a retrieval
    pub fn validate(&self) -> Result<()> {
        if self.service.base_url.trim().is_empty() {
            return Err(Error::config(
                "service.base_url",
                "base URL must be provided",
            ));
        }
        url::Url::parse(&self.service.base_url).map_err(|e| {
            Error::config(
                "service.base_url",
                format!("invalid base URL '{}': {}", self.service.base_url, e),
            )
        })?;
        self.polling.validate()
    }
}

fn default_base_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_user_agent() -> String {
    concat!("datalake-client/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_retries() -> u32 {
    1000
}

fn default_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_chunk_size() -> usize {
    8192
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
