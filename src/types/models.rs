//! Model listing types.

use serde::{Deserialize, Serialize};

/// One model offered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    /// Model id without the `models/` resource prefix.
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub input_limit: u64,
    pub output_limit: u64,
    /// Whether the model can serve content generation calls.
    pub supports_generation: bool,
}

/// Response of the list-models operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelList {
    pub models: Vec<ModelDescriptor>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}
