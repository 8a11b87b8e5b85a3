//! Bounded retry for collaborator calls
//!
//! Generation and send steps get a fixed number of attempts with a fixed
//! pause between them. No exponential backoff: every call already carries
//! its own bounded wait, so stacking growing delays on top would only slow
//! the single-operator run down.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

/// Run `operation` up to `attempts` times, pausing `delay` between tries
///
/// Returns the first success, or the last error once attempts are exhausted.
pub async fn with_retries<T, E, F, Fut>(attempts: u32, delay: Duration, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = attempts.max(1);
    let mut last_err = None;
    for attempt in 1..=attempts {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if attempt < attempts {
                    warn!(attempt, attempts, %err, "attempt failed, retrying");
                    sleep(delay).await;
                }
                last_err = Some(err);
            }
        }
    }
    Err(last_err.expect("at least one attempt ran"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_first_success_needs_one_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retries(3, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retries(3, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("transient")
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = with_retries(2, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(format!("failure {n}")) }
        })
        .await;
        assert_eq!(result.unwrap_err(), "failure 1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retries(0, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(1) }
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
