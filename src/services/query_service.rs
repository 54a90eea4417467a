//! Sort, filter, and pagination over a merged record set.

use std::cmp::Ordering;

use crate::error::AppError;
use crate::models::query::{FilterConfig, PaginationConfig, QueryResult, SortConfig, SortDirection, SortKey};
use crate::models::record::ModelRecord;

/// Run the full query pipeline: sort, then filter, then paginate.
///
/// Sorting happens before filtering so a filtered subset keeps the globally
/// sorted order instead of being re-sorted per page. Totals are computed on
/// the filtered set before the page slice.
pub fn query(
    records: &[ModelRecord],
    sort: Option<SortConfig>,
    filter: &FilterConfig,
    pagination: PaginationConfig,
) -> Result<QueryResult, AppError> {
    if pagination.rows_per_page == 0 {
        return Err(AppError::InvalidInput("rows_per_page must be at least 1".into()));
    }

    let sorted = sort_records(records, sort);
    let filtered = filter_records(&sorted, filter);
    let total_items = filtered.len();
    let total_pages = total_items.div_ceil(pagination.rows_per_page);
    let data = paginate_records(&filtered, pagination);

    Ok(QueryResult {
        data,
        total_items,
        total_pages,
    })
}

/// Stable sort on the configured key; no config keeps input order.
pub fn sort_records(records: &[ModelRecord], sort: Option<SortConfig>) -> Vec<ModelRecord> {
    let mut sorted = records.to_vec();
    if let Some(cfg) = sort {
        sorted.sort_by(|a, b| {
            let ord = compare_field(a, b, cfg.key);
            match cfg.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
    sorted
}

fn compare_field(a: &ModelRecord, b: &ModelRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::InputCost => compare_f64(a.input_cost, b.input_cost),
        SortKey::OutputCost => compare_f64(a.output_cost, b.output_cost),
        SortKey::MaxOutput => a.max_output.cmp(&b.max_output),
        SortKey::ContextSize => a.context_size.cmp(&b.context_size),
        SortKey::EfficiencyScore => compare_f64(a.efficiency_score, b.efficiency_score),
        SortKey::Source => a.source.as_str().cmp(b.source.as_str()),
        SortKey::IsModified => a.is_modified.cmp(&b.is_modified),
    }
}

// Incomparable values (NaN) compare equal; under the stable sort neither
// side moves relative to the other.
fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Keep records that pass the favorites flag and the free-text search.
pub fn filter_records(records: &[ModelRecord], filter: &FilterConfig) -> Vec<ModelRecord> {
    records
        .iter()
        .filter(|r| matches_filter(r, filter))
        .cloned()
        .collect()
}

fn matches_filter(record: &ModelRecord, filter: &FilterConfig) -> bool {
    if filter.show_only_favorites && !filter.favorites.iter().any(|id| id == &record.id) {
        return false;
    }

    if filter.search_term.is_empty() {
        return true;
    }

    // Every string-typed field takes part in the search, including the
    // provenance label.
    let term = filter.search_term.to_lowercase();
    [record.id.as_str(), record.name.as_str(), record.source.as_str()]
        .iter()
        .any(|value| value.to_lowercase().contains(&term))
}

/// Slice out the 1-based page `[(page-1)*rows, page*rows)`.
pub fn paginate_records(records: &[ModelRecord], pagination: PaginationConfig) -> Vec<ModelRecord> {
    let start = pagination.current_page.saturating_sub(1) * pagination.rows_per_page;
    records
        .iter()
        .skip(start)
        .take(pagination.rows_per_page)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::RecordSource;

    fn record(id: &str, name: &str, input_cost: f64, score: f64) -> ModelRecord {
        ModelRecord {
            id: id.to_string(),
            name: name.to_string(),
            input_cost,
            output_cost: 2.0,
            max_output: 1000,
            context_size: 8000,
            efficiency_score: score,
            source: RecordSource::Provider,
            is_modified: false,
            original_data: None,
        }
    }

    fn ids(records: &[ModelRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn no_sort_config_preserves_input_order() {
        let records = vec![record("b", "B", 2.0, 10.0), record("a", "A", 1.0, 20.0)];
        assert_eq!(ids(&sort_records(&records, None)), vec!["b", "a"]);
    }

    #[test]
    fn sort_is_stable_across_duplicate_keys() {
        let records = vec![
            record("first", "Same", 1.0, 10.0),
            record("second", "Same", 1.0, 20.0),
            record("third", "Aaa", 1.0, 30.0),
            record("fourth", "Same", 1.0, 40.0),
        ];
        let sorted = sort_records(
            &records,
            Some(SortConfig {
                key: SortKey::Name,
                direction: SortDirection::Asc,
            }),
        );
        assert_eq!(ids(&sorted), vec!["third", "first", "second", "fourth"]);
    }

    #[test]
    fn descending_reverses_the_comparison() {
        let records = vec![
            record("a", "A", 1.0, 10.0),
            record("b", "B", 3.0, 20.0),
            record("c", "C", 2.0, 30.0),
        ];
        let sorted = sort_records(
            &records,
            Some(SortConfig {
                key: SortKey::InputCost,
                direction: SortDirection::Desc,
            }),
        );
        assert_eq!(ids(&sorted), vec!["b", "c", "a"]);
    }

    #[test]
    fn nan_scores_compare_equal_and_hold_position() {
        let with_nan = vec![
            record("a", "A", 1.0, f64::NAN),
            record("b", "B", 1.0, 50.0),
            record("c", "C", 1.0, f64::NAN),
        ];
        let sorted = sort_records(
            &with_nan,
            Some(SortConfig {
                key: SortKey::EfficiencyScore,
                direction: SortDirection::Asc,
            }),
        );
        // NaN rows neither rise nor sink relative to each other.
        let nan_positions: Vec<&str> = sorted
            .iter()
            .filter(|r| r.efficiency_score.is_nan())
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(nan_positions, vec!["a", "c"]);
    }

    #[test]
    fn search_matches_any_string_field_case_insensitively() {
        let records = vec![record("openai/gpt", "GPT Four", 1.0, 10.0), record("m2", "Claude", 1.0, 20.0)];

        let by_name = filter_records(
            &records,
            &FilterConfig {
                search_term: "claude".into(),
                ..Default::default()
            },
        );
        assert_eq!(ids(&by_name), vec!["m2"]);

        let by_id = filter_records(
            &records,
            &FilterConfig {
                search_term: "OPENAI".into(),
                ..Default::default()
            },
        );
        assert_eq!(ids(&by_id), vec!["openai/gpt"]);

        // The provenance label is a string field too.
        let by_source = filter_records(
            &records,
            &FilterConfig {
                search_term: "provider".into(),
                ..Default::default()
            },
        );
        assert_eq!(by_source.len(), 2);
    }

    #[test]
    fn favorites_flag_intersects_with_search() {
        let records = vec![record("m1", "Alpha", 1.0, 10.0), record("m2", "Alpha Two", 1.0, 20.0)];
        let filtered = filter_records(
            &records,
            &FilterConfig {
                search_term: "alpha".into(),
                show_only_favorites: true,
                favorites: vec!["m2".into()],
            },
        );
        assert_eq!(ids(&filtered), vec!["m2"]);
    }

    #[test]
    fn empty_search_term_passes_everything() {
        let records = vec![record("m1", "Alpha", 1.0, 10.0)];
        let filtered = filter_records(&records, &FilterConfig::default());
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn page_lengths_sum_to_total_items() {
        let records: Vec<ModelRecord> = (0..23)
            .map(|i| record(&format!("m{i}"), &format!("Model {i}"), 1.0, i as f64))
            .collect();
        let filter = FilterConfig::default();

        let first = query(&records, None, &filter, PaginationConfig { current_page: 1, rows_per_page: 10 }).unwrap();
        assert_eq!(first.total_items, 23);
        assert_eq!(first.total_pages, 3);

        let mut seen = 0;
        for page in 1..=first.total_pages {
            let result = query(
                &records,
                None,
                &filter,
                PaginationConfig {
                    current_page: page,
                    rows_per_page: 10,
                },
            )
            .unwrap();
            seen += result.data.len();
        }
        assert_eq!(seen, first.total_items);
    }

    #[test]
    fn out_of_range_page_is_empty_with_totals_intact() {
        let records = vec![record("m1", "Alpha", 1.0, 10.0)];
        let result = query(
            &records,
            None,
            &FilterConfig::default(),
            PaginationConfig {
                current_page: 5,
                rows_per_page: 10,
            },
        )
        .unwrap();
        assert!(result.data.is_empty());
        assert_eq!(result.total_items, 1);
        assert_eq!(result.total_pages, 1);
    }

    #[test]
    fn zero_rows_per_page_is_rejected() {
        let records = vec![record("m1", "Alpha", 1.0, 10.0)];
        let result = query(
            &records,
            None,
            &FilterConfig::default(),
            PaginationConfig {
                current_page: 1,
                rows_per_page: 0,
            },
        );
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn sorted_order_survives_filtering_and_pagination() {
        let records = vec![
            record("m1", "Gamma", 3.0, 10.0),
            record("m2", "Alpha", 1.0, 20.0),
            record("m3", "Beta", 2.0, 30.0),
        ];
        let result = query(
            &records,
            Some(SortConfig {
                key: SortKey::Name,
                direction: SortDirection::Asc,
            }),
            &FilterConfig::default(),
            PaginationConfig {
                current_page: 1,
                rows_per_page: 2,
            },
        )
        .unwrap();
        assert_eq!(ids(&result.data), vec!["m2", "m3"]);
        assert_eq!(result.total_items, 3);
        assert_eq!(result.total_pages, 2);
    }
}
