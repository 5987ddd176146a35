//! Provider reading a JSON snapshot of the browser's data.
//!
//! The snapshot holds the raw output of the browser's tab, bookmark and
//! history APIs:
//!
//! ```json
//! {
//!   "currentWindowId": 1,
//!   "tabs": [{"id": 7, "title": "Inbox", "url": "https://mail.example.com/", "windowId": 1}],
//!   "bookmarks": [{"id": "0", "title": "", "children": []}],
//!   "history": [{"id": "3", "url": "https://docs.rs/", "visitCount": 4, "lastVisitTime": 1700000000000}]
//! }
//! ```
//!
//! A missing key means the browser offered no such API.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Config, HistoryConfig};
use crate::provider::{DataProvider, ProviderError};
use crate::record::SearchResultItem;
use crate::record::browser::{
    BookmarkNode, BrowserTab, HistoryEntry, convert_bookmarks, convert_history, convert_tabs,
};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// The snapshot file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub current_window_id: Option<u64>,
    #[serde(default)]
    pub tabs: Option<Vec<BrowserTab>>,
    #[serde(default)]
    pub bookmarks: Option<Vec<BookmarkNode>>,
    #[serde(default)]
    pub history: Option<Vec<HistoryEntry>>,
}

/// Provider over a snapshot, normalized once at load time.
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    tabs: Vec<SearchResultItem>,
    bookmarks: Vec<SearchResultItem>,
    history: Vec<SearchResultItem>,
}

impl SnapshotProvider {
    /// Load and normalize a snapshot file.
    ///
    /// `now` is the Unix time in milliseconds history ages are measured from.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NotFound` if the file doesn't exist.
    /// Returns `ProviderError::ReadError` if the file cannot be read.
    /// Returns `ProviderError::ParseError` if the JSON is invalid.
    pub fn load(path: &Path, config: &Config, now: f64) -> Result<Self, ProviderError> {
        if !path.exists() {
            return Err(ProviderError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        Ok(Self::from_snapshot(snapshot, config, now))
    }

    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot, config: &Config, now: f64) -> Self {
        let tabs = match snapshot.tabs {
            Some(tabs) => {
                let tabs = if config.tabs.only_current_window {
                    current_window_tabs(tabs, snapshot.current_window_id)
                } else {
                    tabs
                };
                convert_tabs(&tabs)
            }
            None => {
                warn!("No browser tab API found. Returning no results.");
                vec![]
            }
        };

        let bookmarks = match snapshot.bookmarks {
            Some(tree) => convert_bookmarks(&tree, &config.display),
            None => {
                warn!("No browser bookmark API found. Returning no results.");
                vec![]
            }
        };

        let history = match snapshot.history {
            Some(entries) => {
                let entries = history_window(entries, &config.history, now);
                convert_history(&entries, &config.history, &config.display, now)
            }
            None => {
                warn!("No browser history API found. Returning no results.");
                vec![]
            }
        };

        debug!(
            "Loaded snapshot: {} tabs, {} bookmarks, {} history items",
            tabs.len(),
            bookmarks.len(),
            history.len()
        );

        Self {
            tabs,
            bookmarks,
            history,
        }
    }
}

fn current_window_tabs(tabs: Vec<BrowserTab>, current_window_id: Option<u64>) -> Vec<BrowserTab> {
    let Some(window_id) = current_window_id else {
        warn!("Snapshot has no current window, showing tabs of all windows");
        return tabs;
    };
    tabs.into_iter()
        .filter(|tab| tab.window_id == Some(window_id))
        .collect()
}

/// Entries visited within the configured number of days, most recent first,
/// capped at the configured item count.
fn history_window(mut entries: Vec<HistoryEntry>, history: &HistoryConfig, now: f64) -> Vec<HistoryEntry> {
    let start = now - f64::from(history.days_ago) * MILLIS_PER_DAY;
    entries.retain(|entry| entry.last_visit_time.is_none_or(|t| t >= start));
    entries.sort_by(|a, b| {
        let a = a.last_visit_time.unwrap_or(f64::NEG_INFINITY);
        let b = b.last_visit_time.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    entries.truncate(history.max_items);
    entries
}

impl DataProvider for SnapshotProvider {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TabsConfig;
    use tempfile::TempDir;

    const NOW: f64 = 1_700_000_000_000.0;

    fn snapshot_json() -> String {
        let recent = NOW - 3_600_000.0;
        let stale = NOW - 30.0 * MILLIS_PER_DAY;
        format!(
            r#"{{
    "currentWindowId": 1,
    "tabs": [
        {{"id": 1, "title": "Inbox", "url": "https://mail.example.com/", "windowId": 1}},
        {{"id": 2, "title": "Docs", "url": "https://docs.rs/", "windowId": 2}}
    ],
    "bookmarks": [
        {{"id": "0", "title": "", "children": [
            {{"id": "1", "title": "Bookmarks Bar", "children": [
                {{"id": "10", "title": "Rust #lang", "url": "https://www.rust-lang.org/", "dateAdded": {recent}}}
            ]}}
        ]}}
    ],
    "history": [
        {{"id": "h1", "title": "Old", "url": "https://old.example.com/", "visitCount": 1, "lastVisitTime": {stale}}},
        {{"id": "h2", "title": "Recent", "url": "https://new.example.com/", "visitCount": 3, "lastVisitTime": {recent}}}
    ]
}}"#
        )
    }

    fn write_snapshot(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("snapshot.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn load_normalizes_every_source() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(&dir, &snapshot_json());

        let provider = SnapshotProvider::load(&path, &Config::default(), NOW).unwrap();

        assert_eq!(provider.tabs().len(), 2);
        let bookmarks = provider.bookmarks();
        assert_eq!(bookmarks.len(), 1);
        assert_eq!(bookmarks[0].title.as_deref(), Some("Rust"));
        assert_eq!(bookmarks[0].tags, Some(vec!["lang".to_string()]));

        let history = provider.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title.as_deref(), Some("Recent"));
        assert_eq!(history[0].last_visit_seconds_ago, Some(3600.0));
    }

    #[test]
    fn only_current_window_tabs() {
        let snapshot: Snapshot = serde_json::from_str(&snapshot_json()).unwrap();
        let config = Config {
            tabs: TabsConfig {
                only_current_window: true,
            },
            ..Config::default()
        };

        let provider = SnapshotProvider::from_snapshot(snapshot, &config, NOW);
        let tabs = provider.tabs();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].title.as_deref(), Some("Inbox"));
    }

    #[test]
    fn history_is_capped_most_recent_first() {
        let mut snapshot: Snapshot = serde_json::from_str(&snapshot_json()).unwrap();
        let mut config = Config::default();
        config.history.days_ago = 60;
        config.history.max_items = 1;
        snapshot.tabs = None;

        let provider = SnapshotProvider::from_snapshot(snapshot, &config, NOW);
        let history = provider.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title.as_deref(), Some("Recent"));
    }

    #[test]
    fn missing_sources_are_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(&dir, "{}");

        let provider = SnapshotProvider::load(&path, &Config::default(), NOW).unwrap();
        assert!(provider.all_records().is_empty());
    }

    #[test]
    fn missing_file_and_invalid_json() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            SnapshotProvider::load(&missing, &Config::default(), NOW),
            Err(ProviderError::NotFound(_))
        ));

        let path = write_snapshot(&dir, "{not json");
        assert!(matches!(
            SnapshotProvider::load(&path, &Config::default(), NOW),
            Err(ProviderError::ParseError(_))
        ));
    }
}
