//! Polling helpers

use crate::error::{ClientError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
/// How long checks wait for a deleted object to disappear
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Poll `condition` every `interval` until it returns `Ok(true)`.
///
/// Errors from `condition` end the wait immediately.
pub async fn poll_until<F, Fut>(
    what: &str,
    interval: Duration,
    timeout: Duration,
    mut condition: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if condition().await? {
            return Ok(());
        }
        if Instant::now() + interval > deadline {
            return Err(ClientError::Timeout(what.to_string()));
        }
        sleep(interval).await;
    }
}
