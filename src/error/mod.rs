//! Error Handling Module
//!
//! - `types`: the normalized taxonomy (`NormalizedError`, `ErrorKind`, `ErrorCode`)
//! - `failure`: raw per-attempt provider failures and `Retry-After` hints
//! - `classify`: the mapping from the latter to the former
//!
//! # Example
//!
//! ```rust
//! use adi_gateway::error::{classify, ErrorKind, ProviderFailure};
//!
//! let failure = ProviderFailure::Http { status: 503, message: "down".into(), retry_after: None };
//! let error = classify(&failure);
//! assert_eq!(error.kind, ErrorKind::ServerUnavailable);
//! assert!(error.is_retryable());
//! ```

mod classify;
mod failure;
mod types;

pub use classify::{classify, classify_at};
pub use failure::{ProviderFailure, RetryAfter};
pub use types::{ErrorCode, ErrorKind, NormalizedError};

/// Configuration errors raised while assembling a [`crate::config::GatewayConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
    #[error("invalid retry policy: {0}")]
    InvalidRetryPolicy(String),
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}
