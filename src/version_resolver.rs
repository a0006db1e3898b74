//! Versioned API surface fallback
//!
//! Some providers expose the same capability on more than one API version.
//! [`resolve_and_call`] prefers the richer surface and degrades to the stable
//! one when the former fails after its own retries.

use std::fmt::Display;
use std::future::Future;

use crate::error::NormalizedError;
use crate::retry::{RetryPolicy, run_with_retry};

/// Call `call(primary)` under `policy`; if that run fails, call
/// `call(fallback)` under an independent run of the same policy.
///
/// Only the fallback's failure is returned. The primary failure is logged
/// at `warn` and otherwise dropped.
pub async fn resolve_and_call<S, F, Fut, T, E, C>(
    primary: S,
    fallback: S,
    policy: &RetryPolicy,
    call: F,
    classify: C,
) -> Result<T, NormalizedError>
where
    S: Clone + Display,
    F: Fn(S) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> NormalizedError,
{
    match run_with_retry(|| call(primary.clone()), policy, &classify).await {
        Ok(value) => Ok(value),
        Err(primary_error) => {
            tracing::warn!(
                primary = %primary,
                fallback = %fallback,
                kind = ?primary_error.kind,
                status = primary_error.http_status,
                "primary surface failed, falling back: {}",
                primary_error.message
            );
            run_with_retry(|| call(fallback.clone()), policy, &classify).await
        }
    }
}
