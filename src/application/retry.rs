//! Bounded retry with backoff for remote capability calls.
//!
//! Every gateway/evaluator call site gets one configurable timeout and a
//! bounded retry count; exceeding both ends the call with a typed failure,
//! never an unbounded hang.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::warn;

use crate::ports::{EvaluationFailure, GenerationFailure};

/// Errors that classify whether another attempt may succeed.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for GenerationFailure {
    fn is_retryable(&self) -> bool {
        GenerationFailure::is_retryable(self)
    }
}

impl Retryable for EvaluationFailure {
    fn is_retryable(&self) -> bool {
        EvaluationFailure::is_retryable(self)
    }
}

/// Retry/backoff/timeout settings for one call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Sleep before the first retry; doubles on each subsequent one.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            timeout: Duration::from_secs(60),
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `retry` (1-based), doubling each time.
    fn backoff_for(&self, retry: u32) -> Duration {
        self.backoff.saturating_mul(1u32 << (retry - 1).min(16))
    }
}

/// Runs `op` under the policy's timeout, retrying retryable failures with
/// exponential backoff. `timeout_error` converts an elapsed timeout into the
/// operation's own failure type.
pub async fn with_retries<T, E, Fut, Op, TE>(
    policy: &RetryPolicy,
    operation: &str,
    timeout_error: TE,
    mut op: Op,
) -> Result<T, E>
where
    E: Retryable + std::fmt::Display,
    Fut: Future<Output = Result<T, E>>,
    Op: FnMut() -> Fut,
    TE: Fn(u32) -> E,
{
    let timeout_secs = policy.timeout.as_secs().max(1) as u32;
    let mut attempt: u32 = 0;

    loop {
        let error = match timeout(policy.timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(error)) => error,
            Err(_) => timeout_error(timeout_secs),
        };

        if !error.is_retryable() || attempt >= policy.max_retries {
            return Err(error);
        }

        attempt += 1;
        let pause = policy.backoff_for(attempt);
        warn!(
            operation,
            attempt,
            max_retries = policy.max_retries,
            backoff_ms = pause.as_millis() as u64,
            %error,
            "remote call failed, retrying"
        );
        sleep(pause).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            timeout: Duration::from_millis(200),
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn returns_first_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, GenerationFailure> =
            with_retries(&fast_policy(2), "test", |s| GenerationFailure::Timeout {
                timeout_secs: s,
            }, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(7) }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_retryable_failures_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, GenerationFailure> =
            with_retries(&fast_policy(2), "test", |s| GenerationFailure::Timeout {
                timeout_secs: s,
            }, || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(GenerationFailure::Network("reset".into()))
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
    async fn gives_up_after_configured_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, EvaluationFailure> =
            with_retries(&fast_policy(2), "test", |s| EvaluationFailure::Timeout {
                timeout_secs: s,
            }, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(EvaluationFailure::Unavailable { message: "down".into() }) }
            })
            .await;

        assert!(matches!(result, Err(EvaluationFailure::Unavailable { .. })));
        // One initial attempt plus two retries.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_failure_short_circuits() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, EvaluationFailure> =
            with_retries(&fast_policy(5), "test", |s| EvaluationFailure::Timeout {
                timeout_secs: s,
            }, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(EvaluationFailure::AuthenticationFailed) }
            })
            .await;

        assert!(matches!(result, Err(EvaluationFailure::AuthenticationFailed)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_call_becomes_typed_timeout() {
        let policy = RetryPolicy {
            max_retries: 0,
            timeout: Duration::from_millis(10),
            backoff: Duration::from_millis(1),
        };

        let result: Result<u32, GenerationFailure> =
            with_retries(&policy, "test", |s| GenerationFailure::Timeout {
                timeout_secs: s,
            }, || async {
                sleep(Duration::from_secs(5)).await;
                Ok(1)
            })
            .await;

        assert!(matches!(result, Err(GenerationFailure::Timeout { .. })));
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = RetryPolicy {
            max_retries: 3,
            timeout: Duration::from_secs(1),
            backoff: Duration::from_millis(100),
        };
        assert_eq!(policy.backoff_for(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(400));
    }
}
