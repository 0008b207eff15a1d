//! Common test utilities for datalake-client integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use datalake_client::{Config, PollConfig, ServiceConfig, Sleeper};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the mock service serves the result from
pub const RESULT_PATH: &str = "/data/req-42.parquet";

/// Sleeper that records requested delays and returns immediately
#[derive(Clone, Default)]
pub struct CountingSleeper {
    calls: Arc<Mutex<Vec<Duration>>>,
}

impl CountingSleeper {
    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Sleeper for CountingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.calls.lock().unwrap().push(duration);
    }
}

/// Client configuration pointing at `server` with no delay between probes
pub fn config_for(server: &MockServer, max_retries: u32) -> Config {
    Config {
        service: ServiceConfig {
            base_url: server.uri(),
            ..ServiceConfig::default()
        },
        polling: PollConfig {
            max_retries,
            interval: Duration::ZERO,
            ..PollConfig::default()
        },
    }
}

/// Mount a query endpoint that answers with a handle under `RESULT_PATH`
pub async fn mount_query_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result_parquet": format!("{}{}", server.uri(), RESULT_PATH),
            "result_json": format!("{}/data/req-42.json", server.uri()),
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount `count` empty placeholder responses for the result
pub async fn mount_placeholders(server: &MockServer, count: u64) {
    Mock::given(method("GET"))
        .and(path(RESULT_PATH))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(count)
        .expect(count)
        .mount(server)
        .await;
}

/// Mount the finished result
pub async fn mount_result(server: &MockServer, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(RESULT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}
