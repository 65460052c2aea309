//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound the wait for upstream response headers
//! - Cancel the in-flight call cleanly on timeout (the future is dropped)
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout
//! - A zero bound disables the timeout entirely

use std::future::Future;
use std::time::Duration;

use crate::upstream::ForwardError;

/// Convert a configured number of seconds into an optional bound.
pub fn bound_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Run `fut` under an optional deadline.
pub async fn with_deadline<F, T>(limit: Option<Duration>, fut: F) -> Result<T, ForwardError>
where
    F: Future<Output = Result<T, ForwardError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| ForwardError::Timeout(limit))?,
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_from_secs() {
        assert_eq!(bound_from_secs(0), None);
        assert_eq!(bound_from_secs(30), Some(Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn test_deadline_elapses() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, ForwardError>(())
        };
        let limit = Duration::from_millis(50);
        let err = with_deadline(Some(limit), slow).await.unwrap_err();
        assert!(matches!(err, ForwardError::Timeout(d) if d == limit));
    }

    #[tokio::test]
    async fn test_no_deadline_passes_through() {
        let result = with_deadline(None, async { Ok::<_, ForwardError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
