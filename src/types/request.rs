//! Gateway request and result types.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::provider::{Mode, ProviderId};
use crate::error::{ErrorCode, NormalizedError};

/// Untyped process request as received from an HTTP collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_model: Option<String>,
}

impl ProcessRequest {
    pub fn new(
        provider: impl Into<String>,
        content: impl Into<String>,
        mode: impl Into<String>,
    ) -> Self {
        Self {
            provider: Some(provider.into()),
            content: Some(content.into()),
            mode: Some(mode.into()),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_custom_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.custom_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_custom_model(mut self, model: impl Into<String>) -> Self {
        self.custom_model = Some(model.into());
        self
    }
}

/// Typed request routed to one provider.
///
/// `endpoint_override` and `model_override` are only kept for
/// [`ProviderId::ThirdParty`]; the setters drop them for every other provider.
#[derive(Debug)]
pub struct ProviderRequest {
    pub provider_id: ProviderId,
    /// Request-supplied credential; the gateway falls back to configuration.
    pub credential: Option<SecretString>,
    pub content: String,
    pub mode: Mode,
    pub endpoint_override: Option<String>,
    pub model_override: Option<String>,
}

impl ProviderRequest {
    pub fn new(provider_id: ProviderId, content: impl Into<String>, mode: Mode) -> Self {
        Self {
            provider_id,
            credential: None,
            content: content.into(),
            mode,
            endpoint_override: None,
            model_override: None,
        }
    }

    /// Set the credential; blank values are treated as absent.
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        let credential = credential.into();
        let trimmed = credential.trim();
        self.credential = (!trimmed.is_empty()).then(|| SecretString::from(trimmed.to_string()));
        self
    }

    pub fn with_endpoint_override(mut self, endpoint: impl Into<String>) -> Self {
        if self.provider_id == ProviderId::ThirdParty {
            self.endpoint_override = non_blank(endpoint.into());
        }
        self
    }

    pub fn with_model_override(mut self, model: impl Into<String>) -> Self {
        if self.provider_id == ProviderId::ThirdParty {
            self.model_override = non_blank(model.into());
        }
        self
    }

    /// Checks that need no network and no credential: non-blank content and,
    /// for third-party providers, both overrides.
    pub fn validate(&self) -> Result<(), NormalizedError> {
        if self.provider_id == ProviderId::ThirdParty
            && (self.endpoint_override.is_none() || self.model_override.is_none())
        {
            return Err(NormalizedError::invalid(
                ErrorCode::InvalidRequest,
                "customEndpoint and customModel are required for thirdparty provider",
            ));
        }
        if self.content.trim().is_empty() {
            return Err(NormalizedError::invalid(
                ErrorCode::EmptyContent,
                "Content cannot be empty",
            ));
        }
        Ok(())
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl TryFrom<ProcessRequest> for ProviderRequest {
    type Error = NormalizedError;

    /// Validate a wire request in the order the process endpoint reports
    /// problems: missing fields, provider, third-party overrides, mode, content.
    fn try_from(raw: ProcessRequest) -> Result<Self, Self::Error> {
        let (Some(provider), Some(content), Some(mode)) = (raw.provider, raw.content, raw.mode)
        else {
            return Err(NormalizedError::invalid(
                ErrorCode::InvalidRequest,
                "provider, content, and mode are required",
            ));
        };
        if provider.is_empty() || content.is_empty() || mode.is_empty() {
            return Err(NormalizedError::invalid(
                ErrorCode::InvalidRequest,
                "provider, content, and mode are required",
            ));
        }

        let provider_id: ProviderId = provider.parse().map_err(|_| {
            NormalizedError::invalid(
                ErrorCode::InvalidProvider,
                "Provider must be one of: openai, gemini, deepseek, thirdparty",
            )
        })?;

        let mut request = Self::new(provider_id, content, Mode::Expand);
        if let Some(endpoint) = raw.custom_endpoint {
            request = request.with_endpoint_override(endpoint);
        }
        if let Some(model) = raw.custom_model {
            request = request.with_model_override(model);
        }
        if provider_id == ProviderId::ThirdParty
            && (request.endpoint_override.is_none() || request.model_override.is_none())
        {
            return Err(NormalizedError::invalid(
                ErrorCode::InvalidRequest,
                "customEndpoint and customModel are required for thirdparty provider",
            ));
        }

        request.mode = mode.parse().map_err(|_| {
            NormalizedError::invalid(ErrorCode::InvalidMode, "Mode must be one of: expand, polish")
        })?;

        if let Some(api_key) = raw.api_key {
            request = request.with_credential(api_key);
        }
        request.validate()?;
        Ok(request)
    }
}

/// Generated text returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResult {
    #[serde(rename = "result")]
    pub text: String,
    #[serde(rename = "provider")]
    pub provider_id: ProviderId,
    #[serde(rename = "timestamp")]
    pub timestamp_millis: i64,
}

impl ProviderResult {
    pub fn new(text: impl Into<String>, provider_id: ProviderId) -> Self {
        Self {
            text: text.into(),
            provider_id,
            timestamp_millis: chrono::Utc::now().timestamp_millis(),
        }
    }
}
