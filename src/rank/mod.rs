//! Ordering, score filtering and truncation of scored results.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::query::SearchMode;
use crate::record::SearchResultItem;

/// Stand-in age for records that were never visited, so they sort last.
const NEVER_VISITED_SECONDS: f64 = 99_999_999.0;

/// Errors that can occur when ranking.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankError {
    #[error("Unknown sortMode=\"{0}\"")]
    UnsupportedSortKey(String),
}

/// Ordering applied to a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Highest score first.
    Score,
    /// Most recently visited first.
    LastVisited,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Score => f.write_str("score"),
            SortKey::LastVisited => f.write_str("lastVisited"),
        }
    }
}

impl FromStr for SortKey {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(SortKey::Score),
            "lastVisited" => Ok(SortKey::LastVisited),
            other => Err(RankError::UnsupportedSortKey(other.to_string())),
        }
    }
}

/// Sort results by `key`.
///
/// The sort is stable: records comparing equal keep their input order.
pub fn sort_results(results: &mut [SearchResultItem], key: SortKey) {
    match key {
        SortKey::Score => results.sort_by(|a, b| b.score.total_cmp(&a.score)),
        SortKey::LastVisited => results.sort_by(compare_last_visited),
    }
}

fn compare_last_visited(a: &SearchResultItem, b: &SearchResultItem) -> Ordering {
    let age = |item: &SearchResultItem| item.last_visit_seconds_ago.unwrap_or(NEVER_VISITED_SECONDS);
    age(a).total_cmp(&age(b))
}

/// Drop results scoring below `min_score`, keeping the order of the rest.
pub fn filter_min_score(results: &mut Vec<SearchResultItem>, min_score: f64) {
    results.retain(|item| item.score >= min_score);
}

/// Cap the list at `max_results`, except for modes that list every match.
pub fn truncate_results(results: &mut Vec<SearchResultItem>, mode: SearchMode, max_results: usize) {
    if !mode.shows_all_matches() {
        results.truncate(max_results);
    }
}
