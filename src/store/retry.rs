//! Caller-side retry policy for transient storage failures.
//!
//! The transaction executor never retries; deadlock reports, pool
//! exhaustion, and dropped connections are classified as
//! [`AppError::Transient`] and retried here, at the call site, with
//! bounded attempts and jittered exponential backoff. Everything else
//! fails immediately: retrying `Invalid` or `Conflict` with the same
//! input would reproduce the same failure.

use std::time::Duration;

use crate::error::AppError;

/// Bounds for [`call_with_retry`].
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Deadline per attempt; an elapsed deadline counts as transient
    pub attempt_timeout: Duration,
    /// Backoff before the second attempt; doubles each retry
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(10),
            base_backoff: Duration::from_millis(100),
        }
    }
}

/// Run `op` until it succeeds, fails non-transiently, or the attempt
/// budget is spent.
///
/// Each attempt is bounded by `policy.attempt_timeout`. On timeout the
/// in-flight future is dropped, which releases its transaction handle
/// and rolls the transaction back, so the next attempt starts from a
/// clean slate; the elapsed deadline is treated as a transient failure.
pub async fn call_with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        let result = match tokio::time::timeout(policy.attempt_timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Transient(format!(
                "operation timed out after {:?}",
                policy.attempt_timeout
            ))),
        };

        match result {
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let backoff = jittered_backoff(policy.base_backoff, attempt);
                tracing::warn!(
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "transient failure, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
            other => return other,
        }
    }
}

/// Exponential backoff with full jitter: a uniform fraction of
/// `base * 2^(attempt-1)`, at least half of it.
fn jittered_backoff(base: Duration, attempt: u32) -> Duration {
    let exp = base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
    let jitter: f64 = rand::random();
    exp.mul_f64(0.5 + jitter / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            attempt_timeout: Duration::from_millis(50),
            base_backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let attempts = AtomicU32::new(0);

        let result = call_with_retry(&fast_policy(), || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(AppError::Transient("connection dropped".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), _> = call_with_retry(&fast_policy(), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(AppError::Transient("still down".into())) }
        })
        .await;

        assert!(matches!(result, Err(AppError::Transient(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_non_transient_failures() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), _> = call_with_retry(&fast_policy(), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(AppError::Invalid("amount must be positive".into())) }
        })
        .await;

        assert!(matches!(result, Err(AppError::Invalid(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn timeout_counts_as_transient() {
        let policy = RetryPolicy {
            max_attempts: 2,
            attempt_timeout: Duration::from_millis(20),
            base_backoff: Duration::from_millis(1),
        };
        let attempts = AtomicU32::new(0);

        let result: Result<(), _> = call_with_retry(&policy, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            }
        })
        .await;

        assert!(matches!(result, Err(AppError::Transient(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn backoff_grows_and_stays_jittered() {
        let base = Duration::from_millis(100);
        for attempt in 1..=4 {
            let exp = base * 2u32.pow(attempt - 1);
            let backoff = jittered_backoff(base, attempt);
            assert!(backoff >= exp / 2);
            assert!(backoff <= exp);
        }
    }
}
