//! Explicit retry wrapper
//!
//! The error taxonomy classifies retryability and backoff, but no service
//! retries on its own - a caller that wants hardening wraps the call:
//!
//! ```no_run
//! # use qaboard_client::{retry::{with_retry, RetryPolicy}, ApiError};
//! # async fn example() -> Result<(), ApiError> {
//! # async fn flaky_call() -> Result<u32, ApiError> { Ok(1) }
//! let value = with_retry(RetryPolicy::default(), || flaky_call()).await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Run `op`, retrying with exponential backoff while the error is
/// classified retryable. Non-retryable errors surface immediately.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                tokio::time::sleep(ApiError::retry_delay(attempt)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn retries_retryable_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(RetryPolicy { max_attempts: 3 }, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ApiError::Server)
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_retry_non_retryable_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = with_retry(RetryPolicy { max_attempts: 5 }, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiError::NotFound { detail: None }) }
        })
        .await;

        assert_eq!(result, Err(ApiError::NotFound { detail: None }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = with_retry(RetryPolicy { max_attempts: 3 }, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiError::Network) }
        })
        .await;

        assert_eq!(result, Err(ApiError::Network));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
