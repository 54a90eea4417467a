//! Catalog assembly: cache-first fetch, scoring, and user-edit reconciliation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::gateway::FetchModels;
use crate::models::record::{ModelRecord, UserOverride};
use crate::services::{merge_service, score_service};
use crate::store::KvStore;

const MODEL_CACHE_KEY: &str = "catalog:model_cache";
const USER_OVERRIDES_KEY: &str = "catalog:user_overrides";
const FAVORITES_KEY: &str = "catalog:favorites";
const API_CALL_COUNT_KEY: &str = "catalog:api_call_count";

/// Persisted result of one fetch-and-process cycle.
#[derive(Debug, Serialize, Deserialize)]
struct CachedBatch {
    fetched_at: DateTime<Utc>,
    records: Vec<ModelRecord>,
}

/// Load the merged model catalog.
///
/// A cached batch short-circuits the network call entirely; otherwise the
/// gateway is hit once and the processed, normalized batch is written back
/// to the cache. Stored overrides are applied after normalization on every
/// call, so an edit never perturbs the batch statistics.
pub async fn load_models<G: FetchModels>(
    gateway: &G,
    store: &dyn KvStore,
) -> Result<Vec<ModelRecord>, AppError> {
    let batch = match load_cached_batch(store)? {
        Some(records) => records,
        None => fetch_and_cache(gateway, store).await?,
    };

    let overrides = saved_overrides(store)?;
    Ok(merge_service::merge_overrides(&batch, &overrides))
}

/// Drop the cached batch and force exactly one new network call.
/// Concurrent refresh triggers are not coalesced.
pub async fn refresh_models<G: FetchModels>(
    gateway: &G,
    store: &dyn KvStore,
) -> Result<Vec<ModelRecord>, AppError> {
    store.remove(MODEL_CACHE_KEY)?;
    load_models(gateway, store).await
}

fn load_cached_batch(store: &dyn KvStore) -> Result<Option<Vec<ModelRecord>>, AppError> {
    let Some(payload) = store.get(MODEL_CACHE_KEY)? else {
        return Ok(None);
    };

    match serde_json::from_str::<CachedBatch>(&payload) {
        Ok(cached) => {
            tracing::debug!(
                "Serving {} records from the cache (fetched {})",
                cached.records.len(),
                cached.fetched_at
            );
            Ok(Some(cached.records))
        }
        Err(e) => {
            // An unreadable entry behaves as a miss and gets overwritten.
            tracing::warn!("Discarding unreadable model cache: {e}");
            Ok(None)
        }
    }
}

async fn fetch_and_cache<G: FetchModels>(
    gateway: &G,
    store: &dyn KvStore,
) -> Result<Vec<ModelRecord>, AppError> {
    let raw_models = gateway.fetch_models().await?;
    bump_api_call_count(store);

    let mut records: Vec<ModelRecord> = raw_models.iter().map(score_service::process_model).collect();
    score_service::normalize_scores(&mut records);

    let cached = CachedBatch {
        fetched_at: Utc::now(),
        records,
    };
    store.set(MODEL_CACHE_KEY, &serde_json::to_string(&cached)?)?;
    tracing::info!("Fetched and scored {} models", cached.records.len());

    Ok(cached.records)
}

// ── User overrides ────────────────────────────────────────────────────

/// Read the saved override set. A missing entry is an empty set.
pub fn saved_overrides(store: &dyn KvStore) -> Result<Vec<UserOverride>, AppError> {
    match store.get(USER_OVERRIDES_KEY)? {
        Some(payload) => Ok(serde_json::from_str(&payload)?),
        None => Ok(Vec::new()),
    }
}

/// Insert or update an override. An update merges the new partial fields
/// over the stored entry with the same id; the store never holds two
/// overrides for one id.
pub fn upsert_override(store: &dyn KvStore, ov: UserOverride) -> Result<(), AppError> {
    let mut overrides = saved_overrides(store)?;
    match overrides.iter_mut().find(|existing| existing.id == ov.id) {
        Some(existing) => *existing = merge_override_fields(existing, &ov),
        None => overrides.push(ov),
    }
    save_overrides(store, &overrides)
}

/// Remove an override. Unknown ids are a no-op, not an error.
pub fn remove_override(store: &dyn KvStore, id: &str) -> Result<(), AppError> {
    let mut overrides = saved_overrides(store)?;
    overrides.retain(|ov| ov.id != id);
    save_overrides(store, &overrides)
}

fn save_overrides(store: &dyn KvStore, overrides: &[UserOverride]) -> Result<(), AppError> {
    store.set(USER_OVERRIDES_KEY, &serde_json::to_string(overrides)?)
}

fn merge_override_fields(existing: &UserOverride, update: &UserOverride) -> UserOverride {
    UserOverride {
        id: existing.id.clone(),
        name: update.name.clone().or_else(|| existing.name.clone()),
        input_cost: update.input_cost.or(existing.input_cost),
        output_cost: update.output_cost.or(existing.output_cost),
        max_output: update.max_output.or(existing.max_output),
        context_size: update.context_size.or(existing.context_size),
    }
}

// ── Favorites ─────────────────────────────────────────────────────────

/// Read the favorited record ids in insertion order. A missing entry is an
/// empty list.
pub fn favorites(store: &dyn KvStore) -> Result<Vec<String>, AppError> {
    match store.get(FAVORITES_KEY)? {
        Some(payload) => Ok(serde_json::from_str(&payload)?),
        None => Ok(Vec::new()),
    }
}

/// Add the id to the favorites if absent, remove it if present.
/// Returns the updated list.
pub fn toggle_favorite(store: &dyn KvStore, id: &str) -> Result<Vec<String>, AppError> {
    let mut favorites = favorites(store)?;
    match favorites.iter().position(|fav| fav == id) {
        Some(pos) => {
            favorites.remove(pos);
        }
        None => favorites.push(id.to_string()),
    }
    store.set(FAVORITES_KEY, &serde_json::to_string(&favorites)?)?;
    Ok(favorites)
}

// ── Fetch counter ─────────────────────────────────────────────────────

/// Number of network fetches issued so far.
pub fn api_call_count(store: &dyn KvStore) -> usize {
    store
        .get(API_CALL_COUNT_KEY)
        .ok()
        .flatten()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn bump_api_call_count(store: &dyn KvStore) {
    let next = api_call_count(store) + 1;
    // Counter persistence is best-effort and never fails a fetch.
    if let Err(e) = store.set(API_CALL_COUNT_KEY, &next.to_string()) {
        tracing::warn!("Failed to persist API call count: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn upsert_merges_fields_instead_of_duplicating() {
        let store = MemoryStore::new();
        upsert_override(
            &store,
            UserOverride {
                id: "m1".into(),
                name: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .unwrap();
        upsert_override(
            &store,
            UserOverride {
                id: "m1".into(),
                input_cost: Some(4.0),
                ..Default::default()
            },
        )
        .unwrap();

        let overrides = saved_overrides(&store).unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].name.as_deref(), Some("Renamed"));
        assert_eq!(overrides[0].input_cost, Some(4.0));
    }

    #[test]
    fn remove_override_is_a_noop_for_unknown_ids() {
        let store = MemoryStore::new();
        upsert_override(
            &store,
            UserOverride {
                id: "m1".into(),
                ..Default::default()
            },
        )
        .unwrap();

        remove_override(&store, "missing").unwrap();
        assert_eq!(saved_overrides(&store).unwrap().len(), 1);

        remove_override(&store, "m1").unwrap();
        assert!(saved_overrides(&store).unwrap().is_empty());
    }

    #[test]
    fn toggle_favorite_is_an_involution_on_membership() {
        let store = MemoryStore::new();
        assert_eq!(toggle_favorite(&store, "m1").unwrap(), vec!["m1".to_string()]);
        let with_second = toggle_favorite(&store, "m2").unwrap();
        assert_eq!(with_second, vec!["m1".to_string(), "m2".to_string()]);

        // Untoggling m1 keeps m2's position.
        assert_eq!(toggle_favorite(&store, "m1").unwrap(), vec!["m2".to_string()]);
        assert_eq!(favorites(&store).unwrap(), vec!["m2".to_string()]);
    }

    #[test]
    fn api_call_count_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(api_call_count(&store), 0);
        bump_api_call_count(&store);
        bump_api_call_count(&store);
        assert_eq!(api_call_count(&store), 2);
    }
}
