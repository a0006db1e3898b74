//! Gemini model listing wire types.

use serde::{Deserialize, Serialize};

use crate::types::ModelDescriptor;

/// Generation method a model must support to be offered to callers.
pub const GENERATE_CONTENT: &str = "generateContent";

/// Gemini model information from API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiModel {
    /// Resource name, e.g. `models/gemini-1.5-flash`.
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub input_token_limit: Option<u64>,
    #[serde(default)]
    pub output_token_limit: Option<u64>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

/// Response from the list models API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsResponse {
    #[serde(default)]
    pub models: Vec<GeminiModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl From<GeminiModel> for ModelDescriptor {
    fn from(model: GeminiModel) -> Self {
        let id = model
            .name
            .strip_prefix("models/")
            .unwrap_or(&model.name)
            .to_string();
        let supports_generation = model
            .supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT);

        Self {
            display_name: model.display_name.unwrap_or_else(|| id.clone()),
            description: model.description.unwrap_or_default(),
            input_limit: model.input_token_limit.unwrap_or_default(),
            output_limit: model.output_token_limit.unwrap_or_default(),
            supports_generation,
            id,
        }
    }
}
