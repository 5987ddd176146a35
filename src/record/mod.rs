//! Canonical search records and URL normalization.
//!
//! Every source (tab, bookmark, history entry, search engine) is mapped into
//! one [`SearchResultItem`] shape before it reaches the index, the scorer or
//! the ranker.

pub mod browser;

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when handling records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Search result type \"{0}\" not supported")]
    UnsupportedType(String),
}

/// The source a record was normalized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Tab,
    Bookmark,
    History,
    /// A search engine template filled in with the query.
    Search,
}

impl ResultType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResultType::Tab => "tab",
            ResultType::Bookmark => "bookmark",
            ResultType::History => "history",
            ResultType::Search => "search",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tab" => Ok(ResultType::Tab),
            "bookmark" => Ok(ResultType::Bookmark),
            "history" => Ok(ResultType::History),
            "search" => Ok(ResultType::Search),
            other => Err(RecordError::UnsupportedType(other.to_string())),
        }
    }
}

/// A normalized candidate record.
///
/// `search_score` is set by a match index and `score` by the scorer; both are
/// only meaningful within a single search pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    #[serde(rename = "type")]
    pub kind: ResultType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Normalized URL used for matching and display.
    pub url: String,
    /// URL used for opening, only the trailing slash is trimmed.
    pub original_url: String,
    /// Source specific identifier. Not unique across types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    /// Bookmark tags, `None` when tag display is off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Ancestor folder trail, `None` when folder display is off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_count: Option<u32>,
    /// Human readable time since the last visit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit_seconds_ago: Option<f64>,
    /// Unix timestamp in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_score: Option<f64>,
    #[serde(default)]
    pub score: f64,
}

impl SearchResultItem {
    /// Create a record with both URL forms derived from `raw_url`.
    #[must_use]
    pub fn new(kind: ResultType, title: Option<String>, raw_url: &str) -> Self {
        Self {
            kind,
            title,
            url: clean_up_url(raw_url),
            original_url: trim_trailing_slash(raw_url).to_string(),
            original_id: None,
            fav_icon_url: None,
            tags: None,
            folder: None,
            visit_count: None,
            last_visit: None,
            last_visit_seconds_ago: None,
            date_added: None,
            search_score: None,
            score: 0.0,
        }
    }

    /// Tags rendered as `#a #b`.
    #[must_use]
    pub fn tags_text(&self) -> Option<String> {
        self.tags.as_ref().map(|tags| join_prefixed(tags, '#'))
    }

    /// Folder trail rendered as `~a ~b`.
    #[must_use]
    pub fn folder_text(&self) -> Option<String> {
        self.folder.as_ref().map(|folders| join_prefixed(folders, '~'))
    }

    #[must_use]
    pub fn title_lower(&self) -> Option<String> {
        self.title.as_ref().map(|t| t.to_lowercase())
    }
}

fn join_prefixed(values: &[String], prefix: char) -> String {
    values
        .iter()
        .map(|v| format!("{prefix}{v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a URL for matching: lower-case, without scheme, `www.` or
/// trailing slashes.
///
/// Repeated prefixes are all stripped so that the function is idempotent.
#[must_use]
pub fn clean_up_url(url: &str) -> String {
    let lower = url.to_lowercase();
    let mut rest = lower.as_str();

    loop {
        let stripped = rest
            .strip_prefix("https://")
            .or_else(|| rest.strip_prefix("http://"))
            .or_else(|| rest.strip_prefix("www."));
        match stripped {
            Some(s) => rest = s,
            None => break,
        }
    }

    rest.trim_end_matches('/').to_string()
}

/// Remove a single trailing slash.
#[must_use]
pub fn trim_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// Current time as Unix milliseconds.
#[must_use]
pub fn now_millis() -> f64 {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    elapsed.as_secs_f64() * 1000.0
}

/// Human readable duration for an age given in seconds.
#[must_use]
pub fn time_since(seconds: f64) -> String {
    const UNITS: [(f64, &str); 5] = [
        (31_536_000.0, "years"),
        (2_592_000.0, "months"),
        (86_400.0, "days"),
        (3_600.0, "hours"),
        (60.0, "minutes"),
    ];

    for (unit, label) in UNITS {
        let interval = seconds / unit;
        if interval > 1.0 {
            return format!("{} {label}", interval.floor());
        }
    }

    format!("{} seconds", seconds.max(0.0).floor())
}
