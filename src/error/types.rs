//! Normalized error taxonomy
//!
//! Every failure leaving the gateway is a [`NormalizedError`]. Provider
//! specific failures are folded into it by [`crate::error::classify`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Coarse error kind, each carrying a fixed HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Auth,
    RateLimit,
    Timeout,
    ServerUnavailable,
    Invalid,
    Unknown,
}

impl ErrorKind {
    /// HTTP status surfaced for this kind.
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Auth => 401,
            Self::RateLimit => 429,
            Self::Timeout => 504,
            Self::ServerUnavailable => 503,
            Self::Invalid => 400,
            Self::Unknown => 500,
        }
    }

    /// Machine-readable code used when no more specific code applies.
    pub const fn default_code(self) -> ErrorCode {
        match self {
            Self::Auth => ErrorCode::AuthError,
            Self::RateLimit => ErrorCode::RateLimit,
            Self::Timeout => ErrorCode::Timeout,
            Self::ServerUnavailable => ErrorCode::ServiceUnavailable,
            Self::Invalid => ErrorCode::InvalidRequest,
            Self::Unknown => ErrorCode::InternalError,
        }
    }

    /// Short human title, used as the `error` field of HTTP error bodies.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Auth => "Unauthorized",
            Self::RateLimit => "Too many requests",
            Self::Timeout => "Gateway timeout",
            Self::ServerUnavailable => "Service unavailable",
            Self::Invalid => "Invalid request",
            Self::Unknown => "Internal server error",
        }
    }
}

/// Machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AuthError,
    /// No credential in the request nor in the configuration.
    #[serde(rename = "MISSING_API_KEY")]
    MissingCredential,
    RateLimit,
    Timeout,
    ServiceUnavailable,
    InvalidRequest,
    InvalidProvider,
    InvalidMode,
    EmptyContent,
    InternalError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthError => "AUTH_ERROR",
            Self::MissingCredential => "MISSING_API_KEY",
            Self::RateLimit => "RATE_LIMIT",
            Self::Timeout => "TIMEOUT",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidProvider => "INVALID_PROVIDER",
            Self::InvalidMode => "INVALID_MODE",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only error shape crossing the gateway boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct NormalizedError {
    pub kind: ErrorKind,
    pub http_status: u16,
    pub code: ErrorCode,
    pub message: String,
    /// Whether the backoff engine may try the operation again.
    pub retryable: bool,
    /// Provider-suggested wait before the next attempt (rate limits).
    pub retry_after: Option<Duration>,
}

impl NormalizedError {
    /// Create a non-retryable error of the given kind with its default code.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            http_status: kind.http_status(),
            code: kind.default_code(),
            message: message.into(),
            retryable: false,
            retry_after: None,
        }
    }

    pub fn invalid(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid, message).with_code(code)
    }

    pub fn missing_credential(provider: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorKind::Auth,
            format!(
                "API key for {provider} is required. Provide it in the request or configure it in the environment."
            ),
        )
        .with_code(ErrorCode::MissingCredential)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    pub const fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    pub const fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub const fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after = retry_after;
        self
    }

    pub const fn is_retryable(&self) -> bool {
        self.retryable
    }
}
