//! Precise strategy: token prefix matching.

use crate::config::ScoreConfig;
use crate::query::SearchMode;
use crate::record::SearchResultItem;
use crate::search::MatchIndex;
use crate::search::tantivy::{FieldWeights, RecordIndex, TokenMatch};

/// Match index where every query token must be a prefix of an indexed term.
///
/// "git hub" finds "GitHub Hub" but "gti" finds nothing.
pub struct PreciseIndex {
    inner: RecordIndex,
}

impl PreciseIndex {
    /// Create an empty precise index.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying index cannot be created.
    pub fn new(score: &ScoreConfig) -> anyhow::Result<Self> {
        Ok(Self {
            inner: RecordIndex::new(FieldWeights::from_config(score))?,
        })
    }
}

impl MatchIndex for PreciseIndex {
    fn search(&self, term: &str, mode: SearchMode) -> anyhow::Result<Vec<SearchResultItem>> {
        self.inner.search(term, mode, TokenMatch::Prefix)
    }

    fn index(&mut self, records: &[SearchResultItem]) -> anyhow::Result<()> {
        self.inner.rebuild(records)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
