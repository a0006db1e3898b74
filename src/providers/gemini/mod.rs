//! Google Gemini provider
//!
//! Generation goes through `generateContent` on the stable `v1` surface.
//! Model listing is available on both `v1beta` (more models) and `v1`; the
//! gateway prefers the former through the version resolver.

pub mod models;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use super::http::{join_url, send_json};
use super::prompts::Prompt;
use super::CompletionProvider;
use crate::config::{EndpointConfig, GenerationParams};
use crate::error::ProviderFailure;
use crate::types::{ModelDescriptor, ProviderId};
use models::ListModelsResponse;

/// Versioned Gemini API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiApiVersion {
    V1Beta,
    V1,
}

impl GeminiApiVersion {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1Beta => "v1beta",
            Self::V1 => "v1",
        }
    }
}

impl fmt::Display for GeminiApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, ProviderFailure> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| ProviderFailure::Decode("No content in response".to_string()))
    }
}

/// Upper bound on model listing pages fetched in one call.
pub const MAX_MODEL_PAGES: usize = 50;

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    endpoint: EndpointConfig,
    generation: GenerationParams,
}

impl GeminiProvider {
    pub const fn new(endpoint: EndpointConfig, generation: GenerationParams) -> Self {
        Self {
            endpoint,
            generation,
        }
    }

    fn with_key(url: String, credential: &SecretString) -> String {
        let sep = if url.contains('?') { '&' } else { '?' };
        format!(
            "{url}{sep}key={}",
            urlencoding::encode(credential.expose_secret())
        )
    }

    /// `generateContent` URL on the given surface, without the key.
    pub fn generate_url(&self, version: GeminiApiVersion) -> String {
        join_url(
            &self.endpoint.base_url,
            &format!("{version}/models/{}:generateContent", self.endpoint.model),
        )
    }

    /// Model listing URL on the given surface, without the key.
    pub fn models_url(&self, version: GeminiApiVersion) -> String {
        join_url(&self.endpoint.base_url, &format!("{version}/models"))
    }

    /// List every model on one API surface, following pagination.
    ///
    /// Stops early on a repeated page token or after [`MAX_MODEL_PAGES`].
    pub async fn list_models(
        &self,
        http: &HttpClient,
        credential: &SecretString,
        version: GeminiApiVersion,
    ) -> Result<Vec<ModelDescriptor>, ProviderFailure> {
        let mut descriptors = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        for page_number in 1..=MAX_MODEL_PAGES {
            let mut url = Self::with_key(self.models_url(version), credential);
            if let Some(token) = &page_token {
                url.push_str("&pageToken=");
                url.push_str(&urlencoding::encode(token));
            }

            let page: ListModelsResponse = send_json(http.get(&url)).await?;
            descriptors.extend(page.models.into_iter().map(ModelDescriptor::from));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) if seen_tokens.insert(token.clone()) => {
                    if page_number == MAX_MODEL_PAGES {
                        tracing::warn!(%version, pages = page_number, "model listing page limit reached");
                    }
                    page_token = Some(token);
                }
                Some(token) => {
                    tracing::warn!(%version, token = %token, "model listing repeated a page token");
                    break;
                }
                None => break,
            }
        }

        Ok(descriptors)
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn max_delay(&self) -> Duration {
        Duration::from_secs(60)
    }

    async fn complete(
        &self,
        http: &HttpClient,
        credential: &SecretString,
        prompt: &Prompt,
    ) -> Result<String, ProviderFailure> {
        let text = prompt.single_turn();
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: &text }],
            }],
            generation_config: GenerationConfig {
                temperature: self.generation.temperature,
                max_output_tokens: self.generation.max_tokens,
            },
        };
        let url = Self::with_key(self.generate_url(GeminiApiVersion::V1), credential);
        let response: GenerateContentResponse = send_json(http.post(&url).json(&body)).await?;
        response.into_text()
    }
}
