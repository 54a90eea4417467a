use serde::{Deserialize, Serialize};

use crate::models::raw::RawModel;

/// Provenance of a record in the merged set.
///
/// An override on a provider record changes its content, not its origin;
/// only records synthesized from an unmatched override are `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Provider,
    User,
}

impl RecordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSource::Provider => "provider",
            RecordSource::User => "user",
        }
    }
}

/// The canonical unit of the pipeline: one model with scaled costs,
/// capability figures, and a batch-normalized efficiency score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Primary key, unique within the merged set.
    pub id: String,
    pub name: String,
    /// Dollars per one million input tokens.
    pub input_cost: f64,
    /// Dollars per one million output tokens.
    pub output_cost: f64,
    pub max_output: u64,
    pub context_size: u64,
    /// In [0, 100] once the batch has been normalized. Only comparable
    /// against records from the same normalization run.
    pub efficiency_score: f64,
    pub source: RecordSource,
    pub is_modified: bool,
    /// Read-only snapshot of the raw record this was processed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_data: Option<RawModel>,
}

/// A user-supplied partial record keyed by id, stored locally and merged
/// over provider data. Absent fields keep the provider's values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserOverride {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_size: Option<u64>,
}
