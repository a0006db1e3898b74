//! OpenAI-compatible third-party service
//!
//! The caller supplies the full chat completions URL and the model id.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::SecretString;
use std::time::Duration;

use super::prompts::Prompt;
use super::{CompletionProvider, chat_completions};
use crate::config::GenerationParams;
use crate::error::{ErrorCode, NormalizedError, ProviderFailure};
use crate::types::ProviderId;

#[derive(Debug, Clone)]
pub struct ThirdPartyProvider {
    endpoint: String,
    model: String,
    generation: GenerationParams,
}

impl ThirdPartyProvider {
    /// Both the endpoint and the model are required.
    pub fn new(
        endpoint: Option<&str>,
        model: Option<&str>,
        generation: GenerationParams,
    ) -> Result<Self, NormalizedError> {
        match (endpoint, model) {
            (Some(endpoint), Some(model)) => Ok(Self {
                endpoint: endpoint.to_string(),
                model: model.to_string(),
                generation,
            }),
            _ => Err(NormalizedError::invalid(
                ErrorCode::InvalidRequest,
                "customEndpoint and customModel are required for thirdparty provider",
            )),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for ThirdPartyProvider {
    fn id(&self) -> ProviderId {
        ProviderId::ThirdParty
    }

    fn max_delay(&self) -> Duration {
        Duration::from_secs(20)
    }

    async fn complete(
        &self,
        http: &HttpClient,
        credential: &SecretString,
        prompt: &Prompt,
    ) -> Result<String, ProviderFailure> {
        chat_completions::complete(
            http,
            &self.endpoint,
            &self.model,
            credential,
            prompt,
            self.generation,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn requires_endpoint_and_model() {
        let params = GenerationParams::default();
        assert!(ThirdPartyProvider::new(Some("https://x/v1/chat/completions"), Some("m"), params).is_ok());

        for (endpoint, model) in [(None, Some("m")), (Some("https://x"), None), (None, None)] {
            let err = ThirdPartyProvider::new(endpoint, model, params).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Invalid);
            assert_eq!(err.http_status, 400);
        }
    }
}
