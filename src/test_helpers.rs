//! Shared test helpers for driving the client without real sleeping.

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::hooks::PostDownloadHook;
use crate::progress::ProgressReporter;
use crate::retry::Sleeper;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Sleeper that records requested delays and returns immediately.
#[derive(Clone, Default)]
pub(crate) struct RecordingSleeper {
    calls: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub(crate) fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn durations(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.calls.lock().unwrap().push(duration);
    }
}

/// Progress reporter that keeps every event for later assertions.
#[derive(Clone, Default)]
pub(crate) struct RecordingProgress {
    pub(crate) starts: Arc<Mutex<Vec<(u64, String)>>>,
    pub(crate) advanced: Arc<Mutex<Vec<u64>>>,
    pub(crate) finishes: Arc<Mutex<usize>>,
}

impl RecordingProgress {
    pub(crate) fn total_advanced(&self) -> u64 {
        self.advanced.lock().unwrap().iter().sum()
    }
}

impl ProgressReporter for RecordingProgress {
    fn start(&self, total: u64, label: &str) {
        self.starts.lock().unwrap().push((total, label.to_string()));
    }

    fn advance(&self, bytes: u64) {
        self.advanced.lock().unwrap().push(bytes);
    }

    fn finish(&self) {
        *self.finishes.lock().unwrap() += 1;
    }
}

/// Hook that records its invocations and optionally fails.
#[derive(Clone, Default)]
pub(crate) struct RecordingHook {
    pub(crate) calls: Arc<Mutex<Vec<(PathBuf, u64)>>>,
    pub(crate) fail: bool,
}

#[async_trait]
impl PostDownloadHook for RecordingHook {
    async fn on_downloaded(&self, path: &Path, bytes: u64) -> crate::Result<()> {
        self.calls.lock().unwrap().push((path.to_path_buf(), bytes));
        if self.fail {
            return Err(crate::Error::Hook {
                hook: self.name().to_string(),
                message: "refused".into(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
