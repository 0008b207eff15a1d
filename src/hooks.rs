//! Optional post-download processing
//!
//! Runs once, after the result file is fully written. It is kept outside the
//! polling state machine: a hook never influences whether a probe counts as a
//! success, and a failing hook leaves the downloaded file in place.

use async_trait::async_trait;
use std::path::Path;

/// Action performed on a freshly downloaded result
#[async_trait]
pub trait PostDownloadHook: Send + Sync {
    /// Called with the output path and the number of bytes written
    async fn on_downloaded(&self, path: &Path, bytes: u64) -> crate::Result<()>;

    /// Short name used in logs and errors
    fn name(&self) -> &'static str;
}

/// Hook that does nothing
///
/// Used when no post-processing is configured.
///
/// # Examples
///
/// ```
/// use datalake_client::hooks::{NoOpHook, PostDownloadHook};
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let hook = NoOpHook;
/// hook.on_downloaded(Path::new("result.parquet"), 10).await?;
/// assert_eq!(hook.name(), "noop");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpHook;

#[async_trait]
impl PostDownloadHook for NoOpHook {
    async fn on_downloaded(&self, _path: &Path, _bytes: u64) -> crate::Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
