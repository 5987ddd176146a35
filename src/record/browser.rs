//! Browser source records and their conversion into [`SearchResultItem`]s.
//!
//! The source shapes mirror the JSON the browser extension APIs return for
//! tabs, the bookmark tree and history entries.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{DisplayConfig, HistoryConfig};
use crate::record::{ResultType, SearchResultItem, time_since};

/// Bookmark tree nodes up to this depth are browser system folders
/// ("root", "Bookmarks Bar", "Other Bookmarks") and never part of a trail.
const SYSTEM_FOLDER_DEPTH: usize = 2;

/// An open browser tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserTab {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub window_id: Option<u64>,
}

/// A node of the bookmark tree. Folders have children, bookmarks a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Unix timestamp in milliseconds.
    #[serde(default)]
    pub date_added: Option<f64>,
    #[serde(default)]
    pub children: Option<Vec<BookmarkNode>>,
}

/// A browsing history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
    #[serde(default)]
    pub visit_count: Option<u32>,
    /// Unix timestamp in milliseconds.
    #[serde(default)]
    pub last_visit_time: Option<f64>,
}

#[must_use]
pub fn convert_tabs(tabs: &[BrowserTab]) -> Vec<SearchResultItem> {
    tabs.iter()
        .map(|tab| {
            let mut item = SearchResultItem::new(ResultType::Tab, tab.title.clone(), &tab.url);
            item.original_id = Some(tab.id.to_string());
            item.fav_icon_url.clone_from(&tab.fav_icon_url);
            item
        })
        .collect()
}

/// Flatten the bookmark tree into bookmark records.
///
/// Each bookmark carries the trail of its ancestor folders, leaving out the
/// system folders at the top of the tree.
#[must_use]
pub fn convert_bookmarks(tree: &[BookmarkNode], display: &DisplayConfig) -> Vec<SearchResultItem> {
    let mut result = Vec::new();
    walk_bookmarks(tree, &[], 1, display, &mut result);
    result
}

fn walk_bookmarks(
    nodes: &[BookmarkNode],
    folder_trail: &[String],
    depth: usize,
    display: &DisplayConfig,
    result: &mut Vec<SearchResultItem>,
) {
    for node in nodes {
        if let Some(url) = &node.url {
            result.push(convert_bookmark(node, url, folder_trail, display));
        }

        let Some(children) = &node.children else {
            continue;
        };

        if depth > SYSTEM_FOLDER_DEPTH {
            let mut trail = folder_trail.to_vec();
            trail.push(node.title.clone());
            walk_bookmarks(children, &trail, depth + 1, display, result);
        } else {
            walk_bookmarks(children, folder_trail, depth + 1, display, result);
        }
    }
}

fn convert_bookmark(
    node: &BookmarkNode,
    url: &str,
    folder_trail: &[String],
    display: &DisplayConfig,
) -> SearchResultItem {
    let (title, tags) = if display.tags {
        let (title, tags) = split_tags(&node.title);
        (title, Some(tags))
    } else {
        (node.title.clone(), None)
    };

    let title = if title.is_empty() { None } else { Some(title) };
    let mut item = SearchResultItem::new(ResultType::Bookmark, title, url);
    item.original_id = Some(node.id.clone());
    item.date_added = node.date_added;
    item.tags = tags;
    if display.folder_name {
        item.folder = Some(folder_trail.to_vec());
    }
    item
}

/// Split `"Title #tag1 #tag2"` into the title and its tags.
fn split_tags(title: &str) -> (String, Vec<String>) {
    let mut parts = title.split('#');
    let head = parts.next().unwrap_or_default().trim().to_string();
    let tags = parts
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();
    (head, tags)
}

/// Convert history entries, dropping URLs on the ignore list.
///
/// `now` is the Unix time in milliseconds the visit ages are measured from.
#[must_use]
pub fn convert_history(
    entries: &[HistoryEntry],
    history: &HistoryConfig,
    display: &DisplayConfig,
    now: f64,
) -> Vec<SearchResultItem> {
    let mut ignored = 0usize;
    let kept: Vec<&HistoryEntry> = entries
        .iter()
        .filter(|entry| {
            let ignore = history
                .ignore_list
                .iter()
                .any(|prefix| entry.url.starts_with(prefix.as_str()));
            if ignore {
                ignored += 1;
            }
            !ignore
        })
        .collect();

    if !history.ignore_list.is_empty() {
        debug!("Ignored {ignored} history items due to ignore list");
    }

    kept.into_iter()
        .map(|entry| {
            let mut item =
                SearchResultItem::new(ResultType::History, entry.title.clone(), &entry.url);
            item.original_id = Some(entry.id.clone());
            item.visit_count = entry.visit_count;
            item.last_visit_seconds_ago = entry.last_visit_time.map(|t| (now - t) / 1000.0);
            if display.last_visit {
                item.last_visit = item.last_visit_seconds_ago.map(time_since);
            }
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bookmark(id: &str, title: &str, url: &str) -> BookmarkNode {
        BookmarkNode {
            id: id.to_string(),
            title: title.to_string(),
            url: Some(url.to_string()),
            date_added: Some(1_700_000_000_000.0),
            children: None,
        }
    }

    fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> BookmarkNode {
        BookmarkNode {
            id: id.to_string(),
            title: title.to_string(),
            url: None,
            date_added: None,
            children: Some(children),
        }
    }

    fn sample_tree() -> Vec<BookmarkNode> {
        vec![folder(
            "0",
            "",
            vec![folder(
                "1",
                "Bookmarks Bar",
                vec![
                    bookmark("10", "Top Level #news", "https://news.example.com/"),
                    folder(
                        "2",
                        "Work",
                        vec![folder(
                            "3",
                            "Tools",
                            vec![bookmark("11", "Issue Tracker #work #urgent", "https://jira.example.com")],
                        )],
                    ),
                ],
            )],
        )]
    }

    #[test]
    fn tabs_keep_id_and_urls() {
        let tabs = vec![BrowserTab {
            id: 42,
            title: Some("Rust".to_string()),
            url: "https://www.rust-lang.org/".to_string(),
            fav_icon_url: None,
            active: true,
            window_id: Some(1),
        }];

        let items = convert_tabs(&tabs);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ResultType::Tab);
        assert_eq!(items[0].original_id.as_deref(), Some("42"));
        assert_eq!(items[0].url, "rust-lang.org");
        assert_eq!(items[0].original_url, "https://www.rust-lang.org");
    }

    #[test]
    fn bookmark_folder_trail_skips_system_folders() {
        let items = convert_bookmarks(&sample_tree(), &DisplayConfig::default());

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].folder, Some(vec![]));
        assert_eq!(
            items[1].folder,
            Some(vec!["Work".to_string(), "Tools".to_string()])
        );
    }

    #[test]
    fn bookmark_tags_are_extracted_from_title() {
        let items = convert_bookmarks(&sample_tree(), &DisplayConfig::default());

        assert_eq!(items[1].title.as_deref(), Some("Issue Tracker"));
        assert_eq!(
            items[1].tags,
            Some(vec!["work".to_string(), "urgent".to_string()])
        );
        assert_eq!(items[1].tags_text().as_deref(), Some("#work #urgent"));
        assert_eq!(items[1].date_added, Some(1_700_000_000_000.0));
    }

    #[test]
    fn display_toggles_leave_fields_absent() {
        let display = DisplayConfig {
            tags: false,
            folder_name: false,
            last_visit: false,
        };
        let items = convert_bookmarks(&sample_tree(), &display);

        assert_eq!(items[1].title.as_deref(), Some("Issue Tracker #work #urgent"));
        assert!(items[1].tags.is_none());
        assert!(items[1].folder.is_none());
    }

    #[test]
    fn history_ignore_list_and_age() {
        let now = 10_000_000.0;
        let entries = vec![
            HistoryEntry {
                id: "1".to_string(),
                title: Some("Docs".to_string()),
                url: "https://docs.rs/serde".to_string(),
                visit_count: Some(7),
                last_visit_time: Some(now - 7_200_000.0),
            },
            HistoryEntry {
                id: "2".to_string(),
                title: None,
                url: "https://mail.example.com/inbox".to_string(),
                visit_count: Some(100),
                last_visit_time: Some(now),
            },
        ];
        let history = HistoryConfig {
            ignore_list: vec!["https://mail.example.com".to_string()],
            ..HistoryConfig::default()
        };

        let items = convert_history(&entries, &history, &DisplayConfig::default(), now);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ResultType::History);
        assert_eq!(items[0].visit_count, Some(7));
        assert_eq!(items[0].last_visit_seconds_ago, Some(7200.0));
        assert_eq!(items[0].last_visit.as_deref(), Some("2 hours"));
    }

    #[test]
    fn split_tags_without_tags() {
        assert_eq!(split_tags("Plain title "), ("Plain title".to_string(), vec![]));
        assert_eq!(split_tags(""), (String::new(), vec![]));
    }
}
