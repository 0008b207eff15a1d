//! Fixed-interval polling with a bounded retry budget
//!
//! The query service gives no completion callback, so the only way to learn
//! that a result is ready is to ask again. [`poll_with_budget`] runs an
//! attempt, sleeps for the configured interval when the attempt reports
//! not-ready, and gives up with [`Error::RetrievalTimedOut`] once
//! `max_retries` attempts have been spent.
//!
//! Sleeping goes through the [`Sleeper`] trait so tests can observe the
//! delays without waiting for them.
//!
//! # Example
//!
//! ```no_run
//! use datalake_client::config::PollConfig;
//! use datalake_client::retry::{poll_with_budget, TokioSleeper};
//!
//! # async fn example() -> datalake_client::Result<()> {
//! let config = PollConfig::default();
//! let (value, attempts) = poll_with_budget(&config, &TokioSleeper, |attempt| async move {
//!     // Ok(None) means "not ready yet, try again after the interval"
//!     Ok(if attempt >= 3 { Some("done") } else { None })
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use crate::config::PollConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Source of the delay between probes
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration` before the next probe
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Run `operation` until it yields a value or the retry budget runs out
///
/// `operation` receives the 1-based attempt number and returns:
/// - `Ok(Some(value))` when done, which ends polling;
/// - `Ok(None)` when not ready, which costs one retry cycle and one sleep;
/// - `Err(e)` for a fatal failure, which is returned immediately.
///
/// On success the value is returned together with the number of attempts made.
/// After `config.max_retries` not-ready attempts no further attempt is made and
/// [`Error::RetrievalTimedOut`] is returned.
pub async fn poll_with_budget<F, Fut, T>(
    config: &PollConfig,
    sleeper: &dyn Sleeper,
    mut operation: F,
) -> Result<(T, u32)>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let mut retries: u32 = 0;
    let mut waited = Duration::ZERO;

    while retries < config.max_retries {
        let attempt = retries + 1;
        if let Some(value) = operation(attempt).await? {
            if retries > 0 {
                tracing::info!(attempts = attempt, "result became available after polling");
            }
            return Ok((value, attempt));
        }

        tracing::debug!(
            attempt,
            max_retries = config.max_retries,
            delay_ms = config.interval.as_millis(),
            "result not ready, waiting before next probe"
        );
        sleeper.sleep(config.interval).await;
        waited += config.interval;
        retries += 1;
    }

    tracing::error!(
        attempts = retries,
        waited_secs = waited.as_secs(),
        "retry budget exhausted while waiting for result"
    );
    Err(Error::RetrievalTimedOut {
        attempts: retries,
        waited,
    })
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::RecordingSleeper;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn config(max_retries: u32, interval: Duration) -> PollConfig {
        PollConfig {
            max_retries,
            interval,
            ..PollConfig::default()
        }
    }

    #[tokio::test]
    async fn test_ready_on_first_attempt_never_sleeps() {
        let sleeper = RecordingSleeper::default();
        let (value, attempts) = poll_with_budget(&config(3, Duration::ZERO), &sleeper, |_| async {
            Ok(Some(42))
        })
        .await
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(attempts, 1);
        assert_eq!(sleeper.count(), 0);
    }

    #[tokio::test]
    async fn test_not_ready_then_ready_sleeps_between_attempts() {
        let sleeper = RecordingSleeper::default();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let (value, attempts) =
            poll_with_budget(&config(3, Duration::from_secs(5)), &sleeper, |_| {
                let counter = counter_clone.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    Ok(if n < 2 { None } else { Some("done") })
                }
            })
            .await
            .unwrap();

        assert_eq!(value, "done");
        assert_eq!(attempts, 3);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(
            sleeper.durations(),
            vec![Duration::from_secs(5), Duration::from_secs(5)]
        );
    }

    #[tokio::test]
    async fn test_budget_exhaustion_stops_after_bound() {
        let sleeper = RecordingSleeper::default();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = poll_with_budget(&config(3, Duration::from_secs(5)), &sleeper, |_| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<Option<()>, Error>(None)
            }
        })
        .await;

        match result {
            Err(Error::RetrievalTimedOut { attempts, waited }) => {
                assert_eq!(attempts, 3);
                assert_eq!(waited, Duration::from_secs(15));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3, "no probe after the bound");
        assert_eq!(sleeper.count(), 3);
    }

    #[tokio::test]
    async fn test_fatal_error_aborts_without_retry() {
        let sleeper = RecordingSleeper::default();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = poll_with_budget(&config(10, Duration::ZERO), &sleeper, |_| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<Option<()>, _>(Error::Io(std::io::Error::other("read-only filesystem")))
            }
        })
        .await;

        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(sleeper.count(), 0);
    }

    #[tokio::test]
    async fn test_attempt_numbers_are_one_based_and_sequential() {
        let sleeper = RecordingSleeper::default();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let _ = poll_with_budget(&config(4, Duration::ZERO), &sleeper, |attempt| {
            let seen = seen_clone.clone();
            async move {
                seen.lock().unwrap().push(attempt);
                Ok::<Option<()>, Error>(None)
            }
        })
        .await;

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_tokio_sleeper_waits_for_interval() {
        let start = std::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
