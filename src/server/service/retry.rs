//! Retry logic with exponential backoff for fallible async operations.
//!
//! [`RetryPolicy`] holds the tunables (attempt count, initial delay, multiplier) and
//! [`RetryContext`] applies it to any operation whose error implements [`Retryable`], so the
//! policy can be tested independently of what is being retried.

use std::{fmt::Debug, future::Future, time::Duration};

use crate::server::error::retry::{ErrorRetryStrategy, Retryable};

/// Exponential backoff parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_backoff: Duration,
    /// Factor applied to the delay after each further failure.
    pub multiplier: u32,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, initial_backoff: Duration, multiplier: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            multiplier,
        }
    }

    /// Delay to wait after the `failed_attempts`-th failure (1-based).
    ///
    /// With the defaults this yields 1s, 2s, 4s, ...
    pub fn backoff_for(&self, failed_attempts: u32) -> Duration {
        let exponent = failed_attempts.saturating_sub(1);
        let factor = self.multiplier.saturating_pow(exponent);

        self.initial_backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1), 2)
    }
}

/// Executes operations under a [`RetryPolicy`].
///
/// # Retry Behavior
///
/// - Errors with `ErrorRetryStrategy::Retry` are retried until `max_attempts` is reached
/// - Errors with `ErrorRetryStrategy::Fail` return immediately
/// - The last error is returned once attempts are exhausted
///
/// # Example
///
/// ```ignore
/// let ctx = RetryContext::new(RetryPolicy::new(3, Duration::from_millis(500), 2));
///
/// let stat = ctx
///     .execute_with_retry("combat power fetch for OCID abc", || {
///         game_api.get_character_stats("abc")
///     })
///     .await?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryContext {
    policy: RetryPolicy,
}

impl RetryContext {
    /// Creates a new retry context applying `policy`.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Executes an operation with automatic retry logic and exponential backoff.
    ///
    /// # Arguments
    /// - `description` - Human-readable description for logging (e.g., "stat fetch for OCID x")
    /// - `operation` - Produces a fresh future for every attempt
    ///
    /// # Returns
    /// - `Ok(R)` - Operation succeeded
    /// - `Err(E)` - Operation failed permanently or exhausted all retry attempts
    pub async fn execute_with_retry<R, E, F, Fut>(
        &self,
        description: &str,
        operation: F,
    ) -> Result<R, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Retryable + Debug,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt_count = 0;

        loop {
            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                attempt_count + 1,
                max_attempts
            );

            match operation().await {
                Ok(result) => {
                    tracing::debug!("Successfully processed {}", description);
                    return Ok(result);
                }
                Err(e) => match e.to_retry_strategy() {
                    ErrorRetryStrategy::Fail => {
                        tracing::debug!("Permanent error for {}: {:?}", description, e);
                        return Err(e);
                    }
                    ErrorRetryStrategy::Retry => {
                        attempt_count += 1;
                        if attempt_count >= max_attempts {
                            tracing::error!(
                                "Max attempts ({}) exceeded for {}: {:?}",
                                max_attempts,
                                description,
                                e
                            );
                            return Err(e);
                        }

                        let backoff = self.policy.backoff_for(attempt_count);

                        tracing::warn!(
                            "Retrying {} (attempt {}/{}) after {:?}: {:?}",
                            description,
                            attempt_count + 1,
                            max_attempts,
                            backoff,
                            e
                        );

                        tokio::time::sleep(backoff).await;
                    }
                },
            }
        }
    }
}
