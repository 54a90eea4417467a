use serde::{Deserialize, Serialize};

/// Response envelope returned by the models endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub data: Vec<RawModel>,
}

/// A model entry as returned by the provider's pricing API.
///
/// Every nested field tolerates absence so that one sparse or malformed
/// record never aborts the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawModel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context_length: Option<u64>,
    #[serde(default)]
    pub architecture: Option<RawArchitecture>,
    #[serde(default)]
    pub pricing: Option<RawPricing>,
    #[serde(default)]
    pub top_provider: Option<RawTopProvider>,
    #[serde(default)]
    pub per_request_limits: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArchitecture {
    #[serde(default)]
    pub modality: String,
    #[serde(default)]
    pub tokenizer: String,
    #[serde(default)]
    pub instruct_type: Option<String>,
}

/// Decimal-string prices per token, e.g. `"0.000001"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPricing {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub completion: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub request: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTopProvider {
    #[serde(default)]
    pub context_length: Option<u64>,
    #[serde(default)]
    pub max_completion_tokens: Option<u64>,
    #[serde(default)]
    pub is_moderated: bool,
}
