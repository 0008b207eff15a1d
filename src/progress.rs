//! Download progress reporting
//!
//! Progress is only shown while a result body is actually streaming. Waiting
//! for the backend is logged, never rendered as a bar.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Receives progress updates for an in-flight download
pub trait ProgressReporter: Send + Sync {
    /// A download of `total` bytes to `label` is starting
    fn start(&self, total: u64, label: &str);

    /// `bytes` more bytes were written
    fn advance(&self, bytes: u64);

    /// The download ended, successfully or not
    fn finish(&self);
}

/// Reporter that discards all updates
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&self, _total: u64, _label: &str) {}

    fn advance(&self, _bytes: u64) {}

    fn finish(&self) {}
}

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}";

/// Terminal progress bar rendered with indicatif
///
/// A fresh bar is created for every download attempt, so a retried download
/// starts again from zero.
#[derive(Default)]
pub struct BarProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarProgress {
    /// Create a reporter with no active bar
    pub fn new() -> Self {
        Self::default()
    }

    fn style() -> ProgressStyle {
        match ProgressStyle::with_template(BAR_TEMPLATE) {
            Ok(style) => style.progress_chars("#>-"),
            Err(e) => {
                tracing::debug!(error = %e, "invalid progress template, using default bar");
                ProgressStyle::default_bar()
            }
        }
    }
}

impl ProgressReporter for BarProgress {
    fn start(&self, total: u64, label: &str) {
        let pb = ProgressBar::new(total);
        pb.set_style(Self::style());
        pb.set_message(format!("Downloading {label}"));

        if let Ok(mut slot) = self.bar.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.abandon();
        }
    }

    fn advance(&self, bytes: u64) {
        if let Ok(slot) = self.bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.inc(bytes);
        }
    }

    fn finish(&self) {
        if let Ok(mut slot) = self.bar.lock()
            && let Some(pb) = slot.take()
        {
            if pb.position() >= pb.length().unwrap_or(0) {
                pb.finish();
            } else {
                pb.abandon();
            }
        }
    }
}
