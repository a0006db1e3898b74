//! Error classification
//!
//! Maps a [`ProviderFailure`] onto the normalized taxonomy. Rules are
//! evaluated in order and the first match wins:
//!
//! | Condition                              | Kind              | Status | Retry |
//! |----------------------------------------|-------------------|--------|-------|
//! | connect/read timeout, DNS failure      | Timeout           | 504    | yes   |
//! | HTTP 401 / 403                         | Auth              | 401    | no    |
//! | HTTP 429                               | RateLimit         | 429    | yes   |
//! | HTTP >= 500                            | ServerUnavailable | 503    | yes   |
//! | HTTP 400 / malformed request           | Invalid           | 400    | no    |
//! | connection refused / host not found    | ServerUnavailable | 503    | no    |
//! | anything else                          | Unknown           | 500    | no    |

use chrono::{DateTime, Utc};

use super::failure::ProviderFailure;
use super::types::{ErrorKind, NormalizedError};

/// Classify a failure using the current wall clock for `Retry-After` dates.
pub fn classify(failure: &ProviderFailure) -> NormalizedError {
    classify_at(failure, Utc::now())
}

/// Classify a failure, resolving absolute `Retry-After` dates against `now`.
pub fn classify_at(failure: &ProviderFailure, now: DateTime<Utc>) -> NormalizedError {
    match failure {
        ProviderFailure::Timeout(_) | ProviderFailure::DnsFailure(_) => {
            NormalizedError::new(ErrorKind::Timeout, "Request timeout").with_retryable(true)
        }
        ProviderFailure::Http { status, .. } if matches!(status, 401 | 403) => {
            NormalizedError::new(ErrorKind::Auth, "Invalid API key or unauthorized")
        }
        ProviderFailure::Http {
            status: 429,
            retry_after,
            ..
        } => NormalizedError::new(ErrorKind::RateLimit, "Rate limit exceeded")
            .with_retryable(true)
            .with_retry_after(retry_after.map(|hint| hint.remaining(now))),
        ProviderFailure::Http { status, .. } if *status >= 500 => {
            NormalizedError::new(ErrorKind::ServerUnavailable, "Service unavailable")
                .with_retryable(true)
        }
        ProviderFailure::Http {
            status: 400,
            message,
            ..
        } => NormalizedError::new(ErrorKind::Invalid, message.clone()),
        ProviderFailure::MalformedRequest(detail) => NormalizedError::new(
            ErrorKind::Invalid,
            format!("Malformed provider request: {detail}"),
        ),
        ProviderFailure::Unreachable(_) => {
            NormalizedError::new(ErrorKind::ServerUnavailable, "Service unavailable")
        }
        ProviderFailure::Http { message, .. } => NormalizedError::unknown(message.clone()),
        ProviderFailure::Decode(detail) | ProviderFailure::Other(detail) => {
            NormalizedError::unknown(detail.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, RetryAfter};
    use chrono::TimeZone;
    use std::time::Duration;

    fn http(status: u16) -> ProviderFailure {
        ProviderFailure::Http {
            status,
            message: format!("status {status}"),
            retry_after: None,
        }
    }

    #[test]
    fn transport_timeouts_and_dns_are_retryable_timeouts() {
        for failure in [
            ProviderFailure::Timeout("read".into()),
            ProviderFailure::DnsFailure("lookup".into()),
        ] {
            let err = classify(&failure);
            assert_eq!(err.kind, ErrorKind::Timeout);
            assert_eq!(err.http_status, 504);
            assert!(err.retryable);
        }
    }

    #[test]
    fn auth_failures_fail_fast() {
        for status in [401, 403] {
            let err = classify(&http(status));
            assert_eq!(err.kind, ErrorKind::Auth);
            assert_eq!(err.http_status, 401);
            assert_eq!(err.code, ErrorCode::AuthError);
            assert!(!err.retryable);
        }
    }

    #[test]
    fn rate_limit_resolves_retry_after_hints() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let relative = ProviderFailure::Http {
            status: 429,
            message: String::new(),
            retry_after: Some(RetryAfter::Delay(Duration::from_secs(5))),
        };
        let err = classify_at(&relative, now);
        assert_eq!(err.kind, ErrorKind::RateLimit);
        assert!(err.retryable);
        assert_eq!(err.retry_after, Some(Duration::from_secs(5)));

        let absolute = ProviderFailure::Http {
            status: 429,
            message: String::new(),
            retry_after: Some(RetryAfter::At(now + chrono::Duration::seconds(12))),
        };
        assert_eq!(
            classify_at(&absolute, now).retry_after,
            Some(Duration::from_secs(12))
        );

        let stale = ProviderFailure::Http {
            status: 429,
            message: String::new(),
            retry_after: Some(RetryAfter::At(now - chrono::Duration::seconds(30))),
        };
        assert_eq!(classify_at(&stale, now).retry_after, Some(Duration::ZERO));
    }

    #[test]
    fn server_errors_map_to_retryable_503() {
        for status in [500, 502, 503, 599] {
            let err = classify(&http(status));
            assert_eq!(err.kind, ErrorKind::ServerUnavailable);
            assert_eq!(err.http_status, 503);
            assert!(err.retryable);
        }
    }

    #[test]
    fn bad_requests_keep_provider_message() {
        let err = classify(&ProviderFailure::Http {
            status: 400,
            message: "max_tokens is too large".into(),
            retry_after: None,
        });
        assert_eq!(err.kind, ErrorKind::Invalid);
        assert_eq!(err.message, "max_tokens is too large");
        assert!(!err.retryable);

        let err = classify(&ProviderFailure::MalformedRequest("relative URL".into()));
        assert_eq!(err.kind, ErrorKind::Invalid);
    }

    #[test]
    fn unreachable_hosts_are_unavailable_but_not_retried() {
        let err = classify(&ProviderFailure::Unreachable("connection refused".into()));
        assert_eq!(err.kind, ErrorKind::ServerUnavailable);
        assert_eq!(err.http_status, 503);
        assert!(!err.retryable);
    }

    #[test]
    fn everything_else_is_unknown() {
        for failure in [
            http(404),
            http(418),
            ProviderFailure::Decode("No content in response".into()),
            ProviderFailure::Other("boom".into()),
        ] {
            let err = classify(&failure);
            assert_eq!(err.kind, ErrorKind::Unknown);
            assert_eq!(err.http_status, 500);
            assert!(!err.retryable);
        }
    }
}
