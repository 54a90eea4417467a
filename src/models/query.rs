use serde::Serialize;

use crate::models::record::ModelRecord;

/// Field a record set can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Name,
    InputCost,
    OutputCost,
    MaxOutput,
    ContextSize,
    EfficiencyScore,
    Source,
    IsModified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Cycle a column header click: unsorted → ascending → descending →
    /// unsorted. Clicking a different column starts ascending on it.
    pub fn toggle(current: Option<SortConfig>, key: SortKey) -> Option<SortConfig> {
        match current {
            Some(cfg) if cfg.key == key => match cfg.direction {
                SortDirection::Asc => Some(SortConfig {
                    key,
                    direction: SortDirection::Desc,
                }),
                SortDirection::Desc => None,
            },
            _ => Some(SortConfig {
                key,
                direction: SortDirection::Asc,
            }),
        }
    }
}

/// Favorites flag plus free-text search over string fields.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    pub search_term: String,
    pub show_only_favorites: bool,
    pub favorites: Vec<String>,
}

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub current_page: usize,
    pub rows_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            current_page: 1,
            rows_per_page: 10,
        }
    }
}

/// One page of records plus pre-pagination totals.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub data: Vec<ModelRecord>,
    pub total_items: usize,
    pub total_pages: usize,
}
