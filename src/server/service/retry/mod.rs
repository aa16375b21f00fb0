//! Retry logic with exponential backoff for upstream operations.
//!
//! This module provides the `RetryContext` for executing fallible async operations with a
//! bounded number of attempts and exponential backoff between them. It integrates with the
//! error system through [`RetryStrategy`] to stop early on errors that won't resolve by
//! retrying.


use std::{fmt::Debug, future::Future, time::Duration};

use crate::server::error::retry::{ErrorRetryStrategy, RetryStrategy};

/// Context for executing an operation with automatic retry logic.
///
/// Backoff after failed attempt `n` (1-based) is `initial_backoff * 2^(n-1)`: 1s, 2s, 4s, ...
/// with the default initial backoff. No jitter is applied and there is no sleep after the
/// final attempt.
pub struct RetryContext {
    /// Max attempts before failure
    max_attempts: u32,
    /// Backoff after the first failed attempt
    initial_backoff: Duration,
    /// Attempts made by the last `execute_with_retry` call
    attempts: u32,
}

impl RetryContext {
    const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(1000);

    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Self::DEFAULT_INITIAL_BACKOFF,
            attempts: 0,
        }
    }

    /// Override the backoff applied after the first failed attempt.
    pub fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    /// Number of attempts made by the most recent [`RetryContext::execute_with_retry`] call.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Backoff to wait after failed attempt number `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.initial_backoff * 2_u32.saturating_pow(attempt.saturating_sub(1))
    }

    /// Execute an operation with automatic retry logic
    ///
    /// # Arguments
    /// - `description`: Description of the operation for logging (e.g., "delivery date fetch")
    /// - `operation`: Async function performing a single attempt
    ///
    /// # Returns
    /// - `Ok(Some(R))`: An attempt succeeded
    /// - `Ok(None)`: The context allows zero attempts, nothing was run
    /// - `Err(E)`: The most recent error, after either a permanent failure or the final attempt
    pub async fn execute_with_retry<R, E, F, Fut>(
        &mut self,
        description: &str,
        mut operation: F,
    ) -> Result<Option<R>, E>
    where
        E: RetryStrategy + Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        self.attempts = 0;

        while self.attempts < self.max_attempts {
            self.attempts += 1;

            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                self.attempts,
                self.max_attempts
            );

            let e = match operation().await {
                Ok(result) => {
                    tracing::debug!("Successfully processed {}", description);
                    return Ok(Some(result));
                }
                Err(e) => e,
            };

            match e.to_retry_strategy() {
                ErrorRetryStrategy::Fail => {
                    tracing::error!("Permanent error for {}: {:?}", description, e);
                    return Err(e);
                }
                ErrorRetryStrategy::Retry => {
                    if self.attempts >= self.max_attempts {
                        tracing::error!(
                            "Max attempts ({}) exceeded for {}: {:?}",
                            self.max_attempts,
                            description,
                            e
                        );
                        return Err(e);
                    }

                    let backoff = self.backoff_for(self.attempts);

                    tracing::warn!(
                        "Retrying {} (attempt {}/{}) after {:?}: {:?}",
                        description,
                        self.attempts,
                        self.max_attempts,
                        backoff,
                        e
                    );

                    tokio::time::sleep(backoff).await;
                }
            }
        }

        Ok(None)
    }
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}
