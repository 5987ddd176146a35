//! Match index trait and implementations.
//!
//! Free-text queries are answered by one [`MatchIndex`] chosen by the
//! configured [`SearchStrategy`]. Tag and folder queries bypass the index and
//! use the exact lookups in [`taxonomy`].

pub mod engines;
pub mod fuzzy;
pub mod precise;
pub mod tantivy;
pub mod taxonomy;

use crate::config::{ScoreConfig, SearchStrategy};
use crate::query::SearchMode;
use crate::record::SearchResultItem;

use self::fuzzy::FuzzyIndex;
use self::precise::PreciseIndex;

/// Trait for text match backends (precise, fuzzy).
///
/// Returned records carry a `search_score` in `[0, 1]`.
pub trait MatchIndex: Send + Sync {
    /// Search the indexed records matching `term` within the sources of `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the search operation fails.
    fn search(&self, term: &str, mode: SearchMode) -> anyhow::Result<Vec<SearchResultItem>>;

    /// Rebuild the index from the current record set.
    ///
    /// # Errors
    ///
    /// Returns an error if indexing fails.
    fn index(&mut self, records: &[SearchResultItem]) -> anyhow::Result<()>;

    /// Number of indexed records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Create an empty match index for `strategy`.
///
/// # Errors
///
/// Returns an error if the underlying index cannot be created.
pub fn create_match_index(
    strategy: SearchStrategy,
    score: &ScoreConfig,
    fuzzy_distance: u8,
) -> anyhow::Result<Box<dyn MatchIndex>> {
    match strategy {
        SearchStrategy::Precise => Ok(Box::new(PreciseIndex::new(score)?)),
        SearchStrategy::Fuzzy => Ok(Box::new(FuzzyIndex::new(score, fuzzy_distance)?)),
    }
}
