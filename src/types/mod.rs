//! Core types shared by the dispatcher, the gateway and the HTTP adapters.

pub mod models;
pub mod provider;
pub mod request;

pub use models::{ModelDescriptor, ModelList};
pub use provider::{Mode, ProviderId, UnknownMode, UnknownProvider};
pub use request::{ProcessRequest, ProviderRequest, ProviderResult};
