//! Static catalog of supported providers.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ProviderId;

/// Display information for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub id: ProviderId,
    pub name: String,
    pub description: String,
    /// Where users obtain a credential.
    pub url: String,
    pub icon: String,
    pub status: String,
}

impl ProviderInfo {
    fn active(id: ProviderId, name: &str, description: &str, url: &str, icon: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            url: url.to_string(),
            icon: icon.to_string(),
            status: "active".to_string(),
        }
    }

    /// Catalog entry for a provider identity.
    pub fn for_provider(id: ProviderId) -> Self {
        match id {
            ProviderId::OpenAi => Self::active(
                id,
                "OpenAI",
                "GPT-4o Mini - State-of-the-art language model",
                "https://platform.openai.com/api-keys",
                "🔐",
            ),
            ProviderId::Gemini => Self::active(
                id,
                "Google Gemini",
                "Gemini 1.5 Flash - Powerful multimodal model",
                "https://aistudio.google.com/app/apikey",
                "🌐",
            ),
            ProviderId::DeepSeek => Self::active(
                id,
                "DeepSeek",
                "DeepSeek Chat - Advanced reasoning model",
                "https://platform.deepseek.com/api",
                "🚀",
            ),
            ProviderId::ThirdParty => Self::active(
                id,
                "Custom Service",
                "Use your own API service or third-party provider",
                "#",
                "⚙️",
            ),
        }
    }
}

/// Providers endpoint payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCatalog {
    pub providers: Vec<ProviderInfo>,
    /// RFC 3339 generation time.
    pub timestamp: String,
}

/// Every supported provider, in display order.
pub fn providers() -> ProviderCatalog {
    ProviderCatalog {
        providers: ProviderId::ALL
            .into_iter()
            .map(ProviderInfo::for_provider)
            .collect(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_all_four_providers() {
        let catalog = providers();
        let ids: Vec<_> = catalog.providers.iter().map(|p| p.id).collect();
        assert_eq!(ids, ProviderId::ALL.to_vec());
        assert!(catalog.providers.iter().all(|p| p.status == "active"));
        assert!(chrono::DateTime::parse_from_rfc3339(&catalog.timestamp).is_ok());
    }

    #[test]
    fn serializes_ids_in_wire_form() {
        let value = serde_json::to_value(ProviderInfo::for_provider(ProviderId::ThirdParty)).unwrap();
        assert_eq!(value["id"], "thirdparty");
        assert_eq!(value["name"], "Custom Service");
        assert_eq!(value["url"], "#");
    }
}
