//! Server adapters: expose the gateway over HTTP
//!
//! Framework-agnostic pieces live here; the Axum router is in [`axum`]
//! (requires the `server-adapters` feature, which also gates this module).
//!
//! ## Routes
//!
//! - `POST /api/process`: body is a [`crate::ProcessRequest`], answers a
//!   [`crate::ProviderResult`]
//! - `GET /api/list-models?apiKey=`: answers a [`crate::ModelList`]
//! - `GET /api/providers`: answers a [`crate::ProviderCatalog`]
//!
//! Failures answer an [`ErrorBody`] with the status of the normalized error.

use serde::{Deserialize, Serialize};

use crate::error::NormalizedError;

pub mod axum;

/// JSON error payload shared by every route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorBody {
    /// Body for a request using an unsupported method.
    pub fn method_not_allowed(allowed: &str) -> Self {
        Self {
            error: "Method not allowed".to_string(),
            message: format!("Only {allowed} requests are allowed"),
            code: None,
        }
    }
}

impl From<&NormalizedError> for ErrorBody {
    fn from(err: &NormalizedError) -> Self {
        Self {
            error: err.kind.title().to_string(),
            message: err.message.clone(),
            code: Some(err.code.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, ErrorKind};
    use serde_json::json;

    #[test]
    fn normalized_errors_render_with_code() {
        let err = NormalizedError::missing_credential("openai");
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(body["error"], ErrorKind::Auth.title());
        assert_eq!(body["code"], ErrorCode::MissingCredential.as_str());
    }

    #[test]
    fn method_not_allowed_has_no_code() {
        let body = serde_json::to_value(ErrorBody::method_not_allowed("POST")).unwrap();
        assert_eq!(
            body,
            json!({"error": "Method not allowed", "message": "Only POST requests are allowed"})
        );
    }
}
