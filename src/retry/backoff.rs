//! Backoff retry engine
//!
//! Drives a fallible async operation until it succeeds, fails with a
//! non-retryable error, or runs out of retries. Each failure is classified
//! into a [`NormalizedError`]; its `retryable` flag and `retry_after` hint
//! decide whether and how long to wait.

use backoff::backoff::Backoff;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use super::policy::RetryPolicy;
use crate::error::NormalizedError;

/// Result of a single attempt.
#[derive(Debug)]
pub enum AttemptOutcome<T> {
    Success(T),
    Failure {
        error: NormalizedError,
        is_retryable: bool,
        suggested_delay: Option<Duration>,
    },
}

impl<T> AttemptOutcome<T> {
    /// Fold an attempt result through a classifier.
    pub fn from_result<E, C>(result: Result<T, E>, classify: C) -> Self
    where
        C: FnOnce(&E) -> NormalizedError,
    {
        match result {
            Ok(value) => Self::Success(value),
            Err(raw) => {
                let error = classify(&raw);
                Self::Failure {
                    is_retryable: error.is_retryable(),
                    suggested_delay: error.retry_after,
                    error,
                }
            }
        }
    }
}

/// Retry executor bound to one policy.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute `operation` under the policy.
    ///
    /// Returns the first success, or the last classified error once the error
    /// is non-retryable or `max_retries` retries have been spent.
    pub async fn execute<F, Fut, T, E, C>(
        &self,
        mut operation: F,
        classify: C,
    ) -> Result<T, NormalizedError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&E) -> NormalizedError,
    {
        let mut schedule = self.policy.schedule();
        let mut attempt: u32 = 0;

        loop {
            let (error, is_retryable, suggested_delay) =
                match AttemptOutcome::from_result(operation().await, &classify) {
                    AttemptOutcome::Success(value) => return Ok(value),
                    AttemptOutcome::Failure {
                        error,
                        is_retryable,
                        suggested_delay,
                    } => (error, is_retryable, suggested_delay),
                };

            if !is_retryable {
                tracing::debug!(
                    attempt,
                    kind = ?error.kind,
                    status = error.http_status,
                    "non-retryable failure, giving up"
                );
                return Err(error);
            }
            if attempt >= self.policy.max_retries {
                tracing::debug!(
                    attempt,
                    max_retries = self.policy.max_retries,
                    kind = ?error.kind,
                    "retries exhausted"
                );
                return Err(error);
            }

            // Advance the exponential schedule even when a hint overrides it.
            let scheduled = schedule
                .next_backoff()
                .unwrap_or(self.policy.max_delay);
            let base = suggested_delay.unwrap_or(scheduled);
            let wait = self.policy.wait_for(base);

            tracing::warn!(
                attempt,
                kind = ?error.kind,
                status = error.http_status,
                wait_ms = wait.as_millis() as u64,
                retry_after = suggested_delay.is_some(),
                "retryable failure: {}",
                error.message
            );

            sleep(wait).await;
            attempt += 1;
        }
    }
}

/// Run `operation` under `policy`, classifying failures with `classify`.
pub async fn run_with_retry<F, Fut, T, E, C>(
    operation: F,
    policy: &RetryPolicy,
    classify: C,
) -> Result<T, NormalizedError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> NormalizedError,
{
    RetryExecutor::new(policy.clone())
        .execute(operation, classify)
        .await
}
