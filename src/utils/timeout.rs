//! Timeout defaults and the async wrapper every transport call goes through.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::{QueryError, Result};

/// Default send timeout (5s)
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Default receive timeout (5s)
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `fut` to completion or fail with [`QueryError::Timeout`] once `duration` elapses.
///
/// The inner future is dropped on expiry. For a socket receive that means the
/// wait is abandoned; the socket itself stays open until it is closed.
pub async fn with_timeout<F, T>(duration: Duration, op: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => {
            debug!(op, timeout_ms = duration.as_millis() as u64, "Operation timed out");
            Err(QueryError::Timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let value = with_timeout(Duration::from_secs(1), "test", async { Ok::<_, QueryError>(7u8) }).await;
        assert!(matches!(value, Ok(7)));
    }

    #[tokio::test]
    async fn test_expires() {
        let result: Result<()> = with_timeout(Duration::from_millis(10), "test", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, QueryError>(())
        })
        .await;
        assert!(matches!(result, Err(QueryError::Timeout)));
    }
}
