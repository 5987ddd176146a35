//! In-memory provider over already normalized records.

use crate::provider::DataProvider;
use crate::record::{ResultType, SearchResultItem};

/// Provider holding records normalized elsewhere, grouped by source.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    tabs: Vec<SearchResultItem>,
    bookmarks: Vec<SearchResultItem>,
    history: Vec<SearchResultItem>,
}

impl MemoryProvider {
    /// Group `records` by source, keeping their order. Search engine records
    /// are produced per query and dropped here.
    #[must_use]
    pub fn new(records: Vec<SearchResultItem>) -> Self {
        let mut provider = Self::default();
        for record in records {
            match record.kind {
                ResultType::Tab => provider.tabs.push(record),
                ResultType::Bookmark => provider.bookmarks.push(record),
                ResultType::History => provider.history.push(record),
                ResultType::Search => {}
            }
        }
        provider
    }
}

impl DataProvider for MemoryProvider {
    fn tabs(&self) -> Vec<SearchResultItem> {
        self.tabs.clone()
    }

    fn bookmarks(&self) -> Vec<SearchResultItem> {
        self.bookmarks.clone()
    }

    fn history(&self) -> Vec<SearchResultItem> {
        self.history.clone()
    }
}
