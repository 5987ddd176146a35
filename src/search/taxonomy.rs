//! Exact structural lookups by bookmark tag or folder name.
//!
//! These bypass the match index. Results carry no match confidence, which
//! the scorer treats as a full match.

use crate::record::{ResultType, SearchResultItem};

/// Bookmarks carrying every `#`-separated tag of `term`.
#[must_use]
pub fn search_tags(term: &str, records: &[SearchResultItem]) -> Vec<SearchResultItem> {
    search_exact(term, '#', records, |item| item.tags.as_deref())
}

/// Bookmarks inside every `~`-separated folder of `term`.
#[must_use]
pub fn search_folders(term: &str, records: &[SearchResultItem]) -> Vec<SearchResultItem> {
    search_exact(term, '~', records, |item| item.folder.as_deref())
}

fn search_exact(
    term: &str,
    delimiter: char,
    records: &[SearchResultItem],
    field: impl Fn(&SearchResultItem) -> Option<&[String]>,
) -> Vec<SearchResultItem> {
    let wanted: Vec<String> = term
        .split(delimiter)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect();
    if wanted.is_empty() {
        return vec![];
    }

    records
        .iter()
        .filter(|item| item.kind == ResultType::Bookmark)
        .filter(|item| {
            field(item).is_some_and(|values| {
                wanted
                    .iter()
                    .all(|w| values.iter().any(|v| v.to_lowercase() == *w))
            })
        })
        .map(|item| {
            let mut item = item.clone();
            item.search_score = None;
            item
        })
        .collect()
}
