//! Bounded retry with exponential backoff

use std::future::Future;

use crate::domain::config::DEFAULT_MAX_ATTEMPTS;
use crate::domain::media::Duration;

/// How many times to call a provider and how long to wait in between.
///
/// Attempt `k` (zero-based) that fails is followed by a sleep of
/// `base_delay * 2^k` before attempt `k + 1`. With the defaults the
/// schedule is 2s, 4s, 8s, ... and nothing is slept after the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` below one is treated as one.
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            base_delay,
        }
    }

    /// Retry policy that never sleeps, for tests and dry runs
    pub const fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::from_millis(0))
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay after the zero-based `attempt` fails
    pub const fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.doubled(attempt)
    }

    /// Delays actually slept when every attempt fails
    pub fn schedule(&self) -> Vec<Duration> {
        (0..self.max_attempts - 1).map(|a| self.delay_after(a)).collect()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::default_backoff_base())
    }
}

/// The last error of an operation that never succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryError<E> {
    pub error: E,
    /// Attempts made, including the one that produced `error`
    pub attempts: u32,
}

/// Run `operation` until it succeeds, returns a non-retryable error, or
/// the policy's attempts are exhausted.
pub async fn retry_with_backoff<F, Fut, T, E, R>(
    policy: &RetryPolicy,
    operation_name: &str,
    is_retryable: R,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    R: Fn(&E) -> bool,
{
    let mut attempt: u32 = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!(
                        operation = operation_name,
                        attempts = attempt + 1,
                        "Succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(error) => {
                let attempts = attempt + 1;

                if !is_retryable(&error) {
                    tracing::warn!(
                        operation = operation_name,
                        attempts,
                        error = %error,
                        "Non-retryable error, giving up"
                    );
                    return Err(RetryError { error, attempts });
                }

                if attempts >= policy.max_attempts() {
                    tracing::warn!(
                        operation = operation_name,
                        attempts,
                        error = %error,
                        "Retries exhausted"
                    );
                    return Err(RetryError { error, attempts });
                }

                let delay = policy.delay_after(attempt);
                tracing::debug!(
                    operation = operation_name,
                    attempt = attempts,
                    delay = %delay,
                    error = %error,
                    "Attempt failed, backing off"
                );
                tokio::time::sleep(delay.as_std()).await;
                attempt += 1;
            }
        }
    }
}
