//! Raw provider failures
//!
//! A [`ProviderFailure`] is what a single attempt against a provider produces
//! before classification. It keeps only what the classifier needs: the
//! transport condition or the HTTP status, the provider's own message and
//! any `Retry-After` hint.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::error::Error as _;
use std::time::Duration;

/// Failure of one attempt against a provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderFailure {
    /// Connect or read timeout.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Host name could not be resolved.
    #[error("dns resolution failed: {0}")]
    DnsFailure(String),
    /// Connection refused or host unreachable.
    #[error("provider unreachable: {0}")]
    Unreachable(String),
    /// Non-success HTTP status.
    #[error("http {status}: {message}")]
    Http {
        status: u16,
        message: String,
        retry_after: Option<RetryAfter>,
    },
    /// The request could not be built (bad endpoint URL, invalid header).
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    /// The response arrived but did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("{0}")]
    Other(String),
}

impl ProviderFailure {
    /// Build an HTTP failure from a response status, its headers and body.
    ///
    /// The message prefers the provider's `error.message` field, falling back
    /// to a short sample of the raw body.
    pub fn from_response(status: u16, headers: &HeaderMap, body: &str) -> Self {
        let retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(RetryAfter::parse);
        Self::Http {
            status,
            message: provider_error_message(body),
            retry_after,
        }
    }
}

fn provider_error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/error/message")
                .or_else(|| json.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });
    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "API error".to_string(),
        None => body.chars().take(200).collect(),
    }
}

impl From<reqwest::Error> for ProviderFailure {
    fn from(err: reqwest::Error) -> Self {
        // The URL may carry a credential in its query string.
        let err = err.without_url();
        let detail = error_chain(&err);
        if err.is_timeout() {
            Self::Timeout(detail)
        } else if err.is_connect() {
            if looks_like_dns_failure(&detail) {
                Self::DnsFailure(detail)
            } else {
                Self::Unreachable(detail)
            }
        } else if err.is_builder() {
            Self::MalformedRequest(detail)
        } else if err.is_decode() {
            Self::Decode(detail)
        } else {
            Self::Other(detail)
        }
    }
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

fn looks_like_dns_failure(detail: &str) -> bool {
    let lower = detail.to_lowercase();
    lower.contains("dns error")
        || lower.contains("failed to lookup address")
        || lower.contains("name or service not known")
        || lower.contains("no such host")
}

/// `Retry-After` hint: either a relative number of seconds or an absolute
/// HTTP date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAfter {
    Delay(Duration),
    At(DateTime<Utc>),
}

impl RetryAfter {
    /// Parse a `Retry-After` header value. Returns `None` when malformed.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if let Ok(secs) = value.parse::<u64>() {
            return Some(Self::Delay(Duration::from_secs(secs)));
        }
        if let Ok(secs) = value.parse::<f64>() {
            return Duration::try_from_secs_f64(secs).ok().map(Self::Delay);
        }
        DateTime::parse_from_rfc2822(value)
            .or_else(|_| DateTime::parse_from_rfc3339(value))
            .ok()
            .map(|at| Self::At(at.with_timezone(&Utc)))
    }

    /// Remaining wait relative to `now`; instants in the past yield zero.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        match self {
            Self::Delay(delay) => *delay,
            Self::At(at) => (*at - now).to_std().unwrap_or(Duration::ZERO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reqwest::header::HeaderValue;

    #[test]
    fn parses_relative_seconds() {
        assert_eq!(
            RetryAfter::parse("5"),
            Some(RetryAfter::Delay(Duration::from_secs(5)))
        );
        assert_eq!(
            RetryAfter::parse(" 1.5 "),
            Some(RetryAfter::Delay(Duration::from_millis(1500)))
        );
    }

    #[test]
    fn parses_http_date_and_measures_from_now() {
        let parsed = RetryAfter::parse("Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
        let now = Utc.with_ymd_and_hms(2015, 10, 21, 7, 27, 50).unwrap();
        assert_eq!(parsed.remaining(now), Duration::from_secs(10));
    }

    #[test]
    fn past_instants_clamp_to_zero() {
        let parsed = RetryAfter::parse("2015-10-21T07:28:00Z").unwrap();
        let later = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parsed.remaining(later), Duration::ZERO);
    }

    #[tokio::test]
    async fn transport_failures_drop_the_request_url() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/v1/models?key=SUPERSECRETKEY123")
            .send()
            .await
            .unwrap_err();
        let failure = ProviderFailure::from(err);
        assert!(!failure.to_string().contains("SUPERSECRETKEY123"), "{failure}");
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(RetryAfter::parse("soon"), None);
        assert_eq!(RetryAfter::parse("-3"), None);
        assert_eq!(RetryAfter::parse(""), None);
        assert_eq!(RetryAfter::parse("1e300"), None);
        assert_eq!(RetryAfter::parse("NaN"), None);
        assert_eq!(RetryAfter::parse("inf"), None);
    }

    #[test]
    fn response_failure_extracts_provider_message_and_hint() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        let body = r#"{"error":{"message":"slow down","type":"rate_limit"}}"#;

        match ProviderFailure::from_response(429, &headers, body) {
            ProviderFailure::Http {
                status,
                message,
                retry_after,
            } => {
                assert_eq!(status, 429);
                assert_eq!(message, "slow down");
                assert_eq!(
                    retry_after,
                    Some(RetryAfter::Delay(Duration::from_secs(7)))
                );
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn response_failure_samples_non_json_bodies() {
        let failure = ProviderFailure::from_response(502, &HeaderMap::new(), "<html>bad gateway</html>");
        assert!(matches!(
            failure,
            ProviderFailure::Http { ref message, .. } if message == "<html>bad gateway</html>"
        ));
    }
}
