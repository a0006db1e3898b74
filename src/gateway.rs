//! Gateway Entry Point
//!
//! [`Gateway`] is the single call surface used by HTTP handlers: it checks a
//! request, resolves its credential and hands it to the [`Dispatcher`].
//! Every call ends in exactly one [`ProviderResult`] or one
//! [`NormalizedError`].

use chrono::Utc;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::catalog::{self, ProviderCatalog};
use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::error::{ConfigError, ErrorCode, ErrorKind, NormalizedError, classify};
use crate::providers::{GeminiApiVersion, GeminiProvider};
use crate::types::{ModelList, ProcessRequest, ProviderId, ProviderRequest, ProviderResult};
use crate::version_resolver::resolve_and_call;

/// LLM gateway
#[derive(Debug, Clone)]
pub struct Gateway {
    dispatcher: Dispatcher,
}

static_assertions::assert_impl_all!(Gateway: Send, Sync);

impl Gateway {
    /// Build a gateway with its own HTTP client.
    ///
    /// The client carries the per-attempt timeout from `config`.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self::with_http_client(http, config))
    }

    /// Build a gateway around an existing HTTP client.
    pub fn with_http_client(http: reqwest::Client, config: GatewayConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(http, Arc::new(config)),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        self.dispatcher.config()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle one typed request.
    pub async fn handle(&self, request: ProviderRequest) -> Result<ProviderResult, NormalizedError> {
        let span = tracing::info_span!(
            "gateway.handle",
            request_id = %Uuid::new_v4(),
            provider = %request.provider_id,
            mode = %request.mode,
        );

        async move {
            request.validate()?;
            self.dispatcher.credential_for(&request)?;

            let result = self.dispatcher.dispatch(&request).await;
            match &result {
                Ok(r) => tracing::info!(chars = r.text.chars().count(), "request completed"),
                Err(e) => tracing::info!(
                    kind = ?e.kind,
                    status = e.http_status,
                    code = %e.code,
                    "request failed: {}",
                    e.message
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Validate a wire request, then [`Self::handle`] it.
    pub async fn handle_process(
        &self,
        request: ProcessRequest,
    ) -> Result<ProviderResult, NormalizedError> {
        let request = ProviderRequest::try_from(request)?;
        self.handle(request).await
    }

    /// Gemini models able to generate content.
    ///
    /// Tries the `v1beta` listing first and falls back to `v1`.
    pub async fn list_models(&self, api_key: Option<&str>) -> Result<ModelList, NormalizedError> {
        let config = self.dispatcher.config();
        let explicit = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| SecretString::from(k.to_string()));
        let credential = explicit
            .as_ref()
            .or_else(|| config.credential(ProviderId::Gemini))
            .ok_or_else(|| {
                NormalizedError::new(
                    ErrorKind::Auth,
                    "API key is required. Provide it as query parameter ?apiKey=xxx or configure GEMINI_API_KEY in the environment.",
                )
                .with_code(ErrorCode::MissingCredential)
            })?;

        let gemini = GeminiProvider::new(config.gemini.clone(), config.generation);
        let policy = self.dispatcher.policy_for(&gemini);
        let http = self.dispatcher.http();

        let span = tracing::info_span!("gateway.list_models", request_id = %Uuid::new_v4());
        let models = resolve_and_call(
            GeminiApiVersion::V1Beta,
            GeminiApiVersion::V1,
            &policy,
            |version| gemini.list_models(http, credential, version),
            classify,
        )
        .instrument(span)
        .await?;

        Ok(ModelList {
            models: models.into_iter().filter(|m| m.supports_generation).collect(),
            timestamp: Utc::now().timestamp_millis(),
        })
    }

    /// Static provider catalog.
    pub fn providers(&self) -> ProviderCatalog {
        catalog::providers()
    }
}
