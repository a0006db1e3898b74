//! Provider Dispatcher
//!
//! [`Provider`] is the closed set of upstream services. A new service is a
//! new variant, and every `match` below stops compiling until it is handled.
//! [`Dispatcher`] selects the variant for a request and runs one generation
//! under the retry engine.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::error::{NormalizedError, ProviderFailure, classify};
use crate::providers::{
    CompletionProvider, DeepSeekProvider, GeminiProvider, OpenAiProvider, Prompt,
    ThirdPartyProvider,
};
use crate::retry::{RetryPolicy, run_with_retry};
use crate::types::{ProviderId, ProviderRequest, ProviderResult};

/// One calling strategy per provider identity.
#[derive(Debug, Clone)]
pub enum Provider {
    OpenAi(OpenAiProvider),
    Gemini(GeminiProvider),
    DeepSeek(DeepSeekProvider),
    ThirdParty(ThirdPartyProvider),
}

impl Provider {
    /// Build the strategy a request routes to.
    ///
    /// Fails with `Invalid` for a third-party request missing its endpoint
    /// or model.
    pub fn for_request(
        request: &ProviderRequest,
        config: &GatewayConfig,
    ) -> Result<Self, NormalizedError> {
        let generation = config.generation;
        Ok(match request.provider_id {
            ProviderId::OpenAi => Self::OpenAi(OpenAiProvider::new(config.openai.clone(), generation)),
            ProviderId::Gemini => Self::gemini(config),
            ProviderId::DeepSeek => {
                Self::DeepSeek(DeepSeekProvider::new(config.deepseek.clone(), generation))
            }
            ProviderId::ThirdParty => Self::ThirdParty(ThirdPartyProvider::new(
                request.endpoint_override.as_deref(),
                request.model_override.as_deref(),
                generation,
            )?),
        })
    }

    pub fn gemini(config: &GatewayConfig) -> Self {
        Self::Gemini(GeminiProvider::new(config.gemini.clone(), config.generation))
    }

    fn inner(&self) -> &dyn CompletionProvider {
        match self {
            Self::OpenAi(p) => p,
            Self::Gemini(p) => p,
            Self::DeepSeek(p) => p,
            Self::ThirdParty(p) => p,
        }
    }
}

#[async_trait]
impl CompletionProvider for Provider {
    fn id(&self) -> ProviderId {
        self.inner().id()
    }

    fn max_delay(&self) -> Duration {
        self.inner().max_delay()
    }

    async fn complete(
        &self,
        http: &HttpClient,
        credential: &SecretString,
        prompt: &Prompt,
    ) -> Result<String, ProviderFailure> {
        self.inner().complete(http, credential, prompt).await
    }
}

/// Routes requests to providers and runs them under the retry engine.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    http: HttpClient,
    config: Arc<GatewayConfig>,
}

impl Dispatcher {
    pub fn new(http: HttpClient, config: Arc<GatewayConfig>) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn provider_for(&self, request: &ProviderRequest) -> Result<Provider, NormalizedError> {
        Provider::for_request(request, &self.config)
    }

    /// Request credential first, then the configured one for that provider.
    pub fn credential_for<'a>(
        &'a self,
        request: &'a ProviderRequest,
    ) -> Result<&'a SecretString, NormalizedError> {
        request
            .credential
            .as_ref()
            .or_else(|| self.config.credential(request.provider_id))
            .ok_or_else(|| NormalizedError::missing_credential(request.provider_id))
    }

    /// Configured override, else the provider's default policy.
    pub fn policy_for(&self, provider: &impl CompletionProvider) -> RetryPolicy {
        self.config
            .retry_override
            .clone()
            .unwrap_or_else(|| provider.default_retry_policy())
    }

    /// Run one generation for `request`.
    pub async fn dispatch(&self, request: &ProviderRequest) -> Result<ProviderResult, NormalizedError> {
        let provider = self.provider_for(request)?;
        let credential = self.credential_for(request)?;
        let prompt = Prompt::new(request.mode, &request.content);
        let policy = self.policy_for(&provider);

        tracing::debug!(
            provider = %provider.id(),
            max_retries = policy.max_retries,
            max_delay_ms = policy.max_delay.as_millis() as u64,
            "dispatching"
        );

        let text = run_with_retry(
            || provider.complete(&self.http, credential, &prompt),
            &policy,
            classify,
        )
        .await?;

        Ok(ProviderResult::new(text, provider.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, ErrorKind};
    use crate::types::Mode;
    use secrecy::ExposeSecret;

    fn dispatcher(config: GatewayConfig) -> Dispatcher {
        Dispatcher::new(HttpClient::new(), Arc::new(config))
    }

    #[test]
    fn every_identity_maps_to_its_variant() {
        let d = dispatcher(GatewayConfig::new());
        for id in ProviderId::ALL {
            let request = ProviderRequest::new(id, "x", Mode::Expand)
                .with_endpoint_override("http://127.0.0.1:1/v1/chat/completions")
                .with_model_override("local-model");
            let provider = d.provider_for(&request).unwrap();
            assert_eq!(provider.id(), id);
        }
    }

    #[test]
    fn default_policies_carry_provider_ceilings() {
        let d = dispatcher(GatewayConfig::new());
        let ceilings = [
            (ProviderId::OpenAi, 30),
            (ProviderId::Gemini, 60),
            (ProviderId::DeepSeek, 30),
            (ProviderId::ThirdParty, 20),
        ];
        for (id, secs) in ceilings {
            let request = ProviderRequest::new(id, "x", Mode::Polish)
                .with_endpoint_override("http://127.0.0.1:1/v1/chat/completions")
                .with_model_override("m");
            let policy = d.policy_for(&d.provider_for(&request).unwrap());
            assert_eq!(policy.max_retries, 3);
            assert_eq!(policy.initial_delay, Duration::from_secs(1));
            assert_eq!(policy.backoff_multiplier, 2.0);
            assert_eq!(policy.max_delay, Duration::from_secs(secs), "{id}");
        }
    }

    #[test]
    fn retry_override_replaces_defaults() {
        let d = dispatcher(GatewayConfig::new().with_retry_policy(RetryPolicy::no_retry()));
        let provider = Provider::gemini(d.config());
        assert_eq!(d.policy_for(&provider).max_retries, 0);
    }

    #[test]
    fn request_credential_wins_over_configuration() {
        let d = dispatcher(GatewayConfig::new().with_credential(ProviderId::OpenAi, "from-config"));

        let explicit = ProviderRequest::new(ProviderId::OpenAi, "x", Mode::Expand)
            .with_credential("from-request");
        assert_eq!(d.credential_for(&explicit).unwrap().expose_secret(), "from-request");

        let implicit = ProviderRequest::new(ProviderId::OpenAi, "x", Mode::Expand);
        assert_eq!(d.credential_for(&implicit).unwrap().expose_secret(), "from-config");

        let missing = ProviderRequest::new(ProviderId::DeepSeek, "x", Mode::Expand);
        let err = d.credential_for(&missing).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(err.code, ErrorCode::MissingCredential);
    }

    #[tokio::test]
    async fn third_party_without_endpoint_fails_before_any_call() {
        let d = dispatcher(GatewayConfig::new());
        let request = ProviderRequest::new(ProviderId::ThirdParty, "x", Mode::Expand)
            .with_credential("key")
            .with_model_override("m");

        let err = d.dispatch(&request).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Invalid);
        assert_eq!(err.http_status, 400);
    }
}
