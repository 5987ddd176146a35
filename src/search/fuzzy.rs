//! Fuzzy strategy: typo tolerant matching.

use crate::config::ScoreConfig;
use crate::query::SearchMode;
use crate::record::SearchResultItem;
use crate::search::MatchIndex;
use crate::search::tantivy::{FieldWeights, MAX_FUZZY_DISTANCE, RecordIndex, TokenMatch};

/// Match index tolerating up to `distance` typos per query token.
pub struct FuzzyIndex {
    inner: RecordIndex,
    distance: u8,
}

impl FuzzyIndex {
    /// Create an empty fuzzy index. Distances above 2 are clamped.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying index cannot be created.
    pub fn new(score: &ScoreConfig, distance: u8) -> anyhow::Result<Self> {
        Ok(Self {
            inner: RecordIndex::new(FieldWeights::from_config(score))?,
            distance: distance.min(MAX_FUZZY_DISTANCE),
        })
    }

    #[must_use]
    pub fn distance(&self) -> u8 {
        self.distance
    }
}

impl MatchIndex for FuzzyIndex {
    fn search(&self, term: &str, mode: SearchMode) -> anyhow::Result<Vec<SearchResultItem>> {
        self.inner.search(
            term,
            mode,
            TokenMatch::Fuzzy {
                distance: self.distance,
            },
        )
    }

    fn index(&mut self, records: &[SearchResultItem]) -> anyhow::Result<()> {
        self.inner.rebuild(records)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
