//! Gateway configuration
//!
//! `GatewayConfig` is an explicit value handed to [`crate::Gateway::new`].
//! Only [`GatewayConfig::from_env`] touches the process environment; it is a
//! thin wrapper over [`GatewayConfig::from_lookup`], which tests can feed
//! from a map.

use secrecy::SecretString;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::ConfigError;
use crate::retry::RetryPolicy;
use crate::types::ProviderId;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Per-attempt network timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const REQUEST_TIMEOUT_ENV: &str = "ADI_REQUEST_TIMEOUT_SECS";

/// Where and with which model a first-party provider is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub base_url: String,
    pub model: String,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

/// Sampling parameters sent with every generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// Gateway configuration
#[derive(Debug)]
pub struct GatewayConfig {
    credentials: HashMap<ProviderId, SecretString>,
    pub openai: EndpointConfig,
    pub deepseek: EndpointConfig,
    pub gemini: EndpointConfig,
    pub generation: GenerationParams,
    pub request_timeout: Duration,
    /// Replaces every provider's default retry policy when set.
    pub retry_override: Option<RetryPolicy>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            credentials: HashMap::new(),
            openai: EndpointConfig::new(DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL),
            deepseek: EndpointConfig::new(DEFAULT_DEEPSEEK_BASE_URL, DEFAULT_DEEPSEEK_MODEL),
            gemini: EndpointConfig::new(DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL),
            generation: GenerationParams::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_override: None,
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        for provider in ProviderId::ALL {
            if let Some(key) = get(provider.credential_env_var()) {
                config = config.with_credential(provider, key);
            }
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            config.openai.base_url = url;
        }
        if let Some(url) = get("DEEPSEEK_BASE_URL") {
            config.deepseek.base_url = url;
        }
        if let Some(url) = get("GEMINI_BASE_URL") {
            config.gemini.base_url = url;
        }
        if let Some(raw) = get(REQUEST_TIMEOUT_ENV) {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: REQUEST_TIMEOUT_ENV.to_string(),
                reason: format!("expected whole seconds, got {raw:?}"),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Configure the fallback credential for a provider.
    pub fn with_credential(mut self, provider: ProviderId, key: impl Into<String>) -> Self {
        self.credentials
            .insert(provider, SecretString::from(key.into()));
        self
    }

    /// Configured fallback credential for a provider, if any.
    pub fn credential(&self, provider: ProviderId) -> Option<&SecretString> {
        self.credentials.get(&provider)
    }

    /// Override the base URL of a first-party provider. Third-party requests
    /// carry their own endpoint, so that id is ignored.
    pub fn with_base_url(mut self, provider: ProviderId, base_url: impl Into<String>) -> Self {
        if let Some(endpoint) = self.endpoint_mut(provider) {
            endpoint.base_url = base_url.into();
        }
        self
    }

    /// Override the model of a first-party provider; ignored for third-party.
    pub fn with_model(mut self, provider: ProviderId, model: impl Into<String>) -> Self {
        if let Some(endpoint) = self.endpoint_mut(provider) {
            endpoint.model = model.into();
        }
        self
    }

    /// Set sampling parameters
    pub const fn with_generation(mut self, generation: GenerationParams) -> Self {
        self.generation = generation;
        self
    }

    /// Set the per-attempt network timeout
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Use one retry policy for every provider instead of their defaults
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_override = Some(policy);
        self
    }

    fn endpoint_mut(&mut self, provider: ProviderId) -> Option<&mut EndpointConfig> {
        match provider {
            ProviderId::OpenAi => Some(&mut self.openai),
            ProviderId::DeepSeek => Some(&mut self.deepseek),
            ProviderId::Gemini => Some(&mut self.gemini),
            ProviderId::ThirdParty => None,
        }
    }

    /// Semantic checks that serde-free construction cannot enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "request_timeout".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        for (name, endpoint) in [
            ("openai", &self.openai),
            ("deepseek", &self.deepseek),
            ("gemini", &self.gemini),
        ] {
            if !(endpoint.base_url.starts_with("http://") || endpoint.base_url.starts_with("https://"))
            {
                return Err(ConfigError::InvalidValue {
                    name: format!("{name}.base_url"),
                    reason: format!("not an http(s) URL: {}", endpoint.base_url),
                });
            }
        }
        if let Some(policy) = &self.retry_override {
            policy.validate()?;
        }
        Ok(())
    }
}
