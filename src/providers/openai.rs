//! OpenAI chat completions provider.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::SecretString;
use std::time::Duration;

use super::http::join_url;
use super::prompts::Prompt;
use super::{CompletionProvider, chat_completions};
use crate::config::{EndpointConfig, GenerationParams};
use crate::error::ProviderFailure;
use crate::types::ProviderId;

#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    endpoint: EndpointConfig,
    generation: GenerationParams,
}

impl OpenAiProvider {
    pub const fn new(endpoint: EndpointConfig, generation: GenerationParams) -> Self {
        Self {
            endpoint,
            generation,
        }
    }

    pub fn chat_url(&self) -> String {
        join_url(&self.endpoint.base_url, "chat/completions")
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn max_delay(&self) -> Duration {
        Duration::from_secs(30)
    }

    async fn complete(
        &self,
        http: &HttpClient,
        credential: &SecretString,
        prompt: &Prompt,
    ) -> Result<String, ProviderFailure> {
        chat_completions::complete(
            http,
            &self.chat_url(),
            &self.endpoint.model,
            credential,
            prompt,
            self.generation,
        )
        .await
    }
}
