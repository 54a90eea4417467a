//! Reconciliation of provider records with locally stored user edits.

use crate::models::raw::{RawArchitecture, RawModel, RawTopProvider};
use crate::models::record::{ModelRecord, RecordSource, UserOverride};
use crate::services::score_service;

const DEFAULT_USER_MODEL_NAME: &str = "User Created Model";

/// Merge provider records with the stored override set into one
/// authoritative record set.
///
/// Provider records come first in their input order, each with a matching
/// override overlaid; overrides without a provider counterpart are
/// synthesized into user records and appended in override order. The merge
/// never re-sorts and is idempotent for fixed inputs.
pub fn merge_overrides(
    provider_records: &[ModelRecord],
    overrides: &[UserOverride],
) -> Vec<ModelRecord> {
    let mut merged: Vec<ModelRecord> = provider_records
        .iter()
        .map(|record| match overrides.iter().find(|ov| ov.id == record.id) {
            Some(ov) => apply_override(record, ov),
            None => record.clone(),
        })
        .collect();

    merged.extend(
        overrides
            .iter()
            .filter(|ov| !provider_records.iter().any(|r| r.id == ov.id))
            .map(synthesize_user_record),
    );

    merged
}

/// Overlay the override's present fields on a clone of the record.
/// Provenance is kept: an edit changes content, not origin.
fn apply_override(record: &ModelRecord, ov: &UserOverride) -> ModelRecord {
    let mut merged = record.clone();
    if let Some(name) = &ov.name {
        merged.name = name.clone();
    }
    if let Some(input_cost) = ov.input_cost {
        merged.input_cost = input_cost;
    }
    if let Some(output_cost) = ov.output_cost {
        merged.output_cost = output_cost;
    }
    if let Some(max_output) = ov.max_output {
        merged.max_output = max_output;
    }
    if let Some(context_size) = ov.context_size {
        merged.context_size = context_size;
    }
    merged.is_modified = true;
    merged
}

/// Build a full record for an override that matches no provider id.
///
/// The synthesized raw record carries zero-cost pricing and a plain-text
/// architecture; the override's fields are overlaid after processing, so its
/// costs land unscaled and its score stays at the zero-cost default (user
/// records are never normalized against the batch).
fn synthesize_user_record(ov: &UserOverride) -> ModelRecord {
    let raw = RawModel {
        id: ov.id.clone(),
        name: ov
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_MODEL_NAME.to_string()),
        created: None,
        description: String::new(),
        context_length: ov.context_size,
        architecture: Some(RawArchitecture {
            modality: "text->text".into(),
            tokenizer: "Unknown".into(),
            instruct_type: None,
        }),
        pricing: None,
        top_provider: Some(RawTopProvider {
            context_length: ov.context_size,
            max_completion_tokens: ov.max_output,
            is_moderated: false,
        }),
        per_request_limits: None,
    };

    let mut record = apply_override(&score_service::process_model(&raw), ov);
    record.source = RecordSource::User;
    record
}
