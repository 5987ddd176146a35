//! Data provider trait and implementations.
//!
//! A provider hands out normalized records per source. An absent source
//! (no tab, bookmark or history data available) yields an empty list and a
//! diagnostic, never an error, so a search pass always has a candidate set.

pub mod memory;
pub mod snapshot;

use std::path::PathBuf;

use crate::query::SearchMode;
use crate::record::SearchResultItem;

/// Errors that can occur when loading provider data.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Snapshot not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to read snapshot: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse snapshot: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Trait for record sources (browser snapshot, in-memory, etc.).
pub trait DataProvider: Send + Sync {
    /// Open tabs.
    fn tabs(&self) -> Vec<SearchResultItem>;

    /// Bookmarks, flattened from the bookmark tree.
    fn bookmarks(&self) -> Vec<SearchResultItem>;

    /// Browsing history, most recent first.
    fn history(&self) -> Vec<SearchResultItem>;

    /// Every record a match index is built from.
    fn all_records(&self) -> Vec<SearchResultItem> {
        let mut records = self.tabs();
        records.extend(self.bookmarks());
        records.extend(self.history());
        records
    }

    /// Records shown before anything is typed.
    fn default_entries(&self, mode: SearchMode) -> Vec<SearchResultItem> {
        match mode {
            SearchMode::All => {
                let mut entries = self.tabs();
                entries.extend(self.history());
                entries
            }
            SearchMode::Tabs => self.tabs(),
            SearchMode::History => self.history(),
            SearchMode::Bookmarks => self.bookmarks(),
            SearchMode::Tags => self
                .bookmarks()
                .into_iter()
                .filter(|b| b.tags.as_ref().is_some_and(|t| !t.is_empty()))
                .collect(),
            SearchMode::Folders => self
                .bookmarks()
                .into_iter()
                .filter(|b| b.folder.as_ref().is_some_and(|f| !f.is_empty()))
                .collect(),
            SearchMode::Search => vec![],
        }
    }
}

/// Per-source record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceCounts {
    pub tabs: usize,
    pub bookmarks: usize,
    pub history: usize,
}

impl SourceCounts {
    #[must_use]
    pub fn of(provider: &dyn DataProvider) -> Self {
        Self {
            tabs: provider.tabs().len(),
            bookmarks: provider.bookmarks().len(),
            history: provider.history().len(),
        }
    }
}
