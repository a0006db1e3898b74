//! Provider Implementations
//!
//! One module per upstream service. Each exposes a type implementing
//! [`CompletionProvider`]; the closed set of them is assembled by
//! [`crate::dispatch::Provider`].

mod chat_completions;
mod http;

pub mod deepseek;
pub mod gemini;
pub mod openai;
pub mod prompts;
pub mod thirdparty;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::SecretString;
use std::time::Duration;

use crate::error::ProviderFailure;
use crate::retry::RetryPolicy;
use crate::types::ProviderId;

pub use deepseek::DeepSeekProvider;
pub use gemini::{GeminiApiVersion, GeminiProvider};
pub use openai::OpenAiProvider;
pub use prompts::Prompt;
pub use thirdparty::ThirdPartyProvider;

/// A single generation attempt against one upstream service.
///
/// Implementations perform exactly one HTTP exchange per call and never
/// retry; retries are layered on by the caller.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Ceiling for any wait between attempts against this provider.
    fn max_delay(&self) -> Duration;

    /// Default retry policy: 3 retries from 1s, doubling, capped at
    /// [`Self::max_delay`].
    fn default_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default().with_max_delay(self.max_delay())
    }

    async fn complete(
        &self,
        http: &HttpClient,
        credential: &SecretString,
        prompt: &Prompt,
    ) -> Result<String, ProviderFailure>;
}
