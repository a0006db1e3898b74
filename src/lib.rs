//! # adi-gateway
//!
//! Provider-agnostic LLM gateway for the ADI Writer assistant. A request names
//! a provider (OpenAI, Google Gemini, DeepSeek or an OpenAI-compatible
//! third-party service), some content and a rewriting mode; the gateway
//! calls that provider under an exponential backoff policy and returns either
//! the generated text or a single normalized error.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use adi_gateway::{Gateway, GatewayConfig, Mode, ProviderId, ProviderRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = Gateway::new(GatewayConfig::from_env()?)?;
//!
//!     let request = ProviderRequest::new(ProviderId::OpenAi, "他推开了门。", Mode::Expand)
//!         .with_credential("your-api-key");
//!     let result = gateway.handle(request).await?;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`retry`]: retry policy and the backoff engine
//! - [`error`]: normalized errors and the classifier
//! - [`version_resolver`]: richer-surface-first fallback
//! - [`dispatch`]: the closed set of providers
//! - [`gateway`]: the entry point used by HTTP handlers

#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod providers;
pub mod retry;
pub mod types;
pub mod version_resolver;

#[cfg(feature = "server-adapters")]
pub mod server_adapters;

pub use catalog::{ProviderCatalog, ProviderInfo};
pub use config::{EndpointConfig, GatewayConfig, GenerationParams};
pub use dispatch::{Dispatcher, Provider};
pub use error::{ConfigError, ErrorCode, ErrorKind, NormalizedError, ProviderFailure};
pub use gateway::Gateway;
pub use retry::{RetryPolicy, run_with_retry};
pub use types::{
    Mode, ModelDescriptor, ModelList, ProcessRequest, ProviderId, ProviderRequest, ProviderResult,
};
pub use version_resolver::resolve_and_call;
