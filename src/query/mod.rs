//! Query routing: turns the raw input into a search mode and a clean term.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which sources and strategy a query is answered from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    All,
    Bookmarks,
    History,
    Tabs,
    /// Only search engine results.
    Search,
    Tags,
    Folders,
}

impl SearchMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::All => "all",
            SearchMode::Bookmarks => "bookmarks",
            SearchMode::History => "history",
            SearchMode::Tabs => "tabs",
            SearchMode::Search => "search",
            SearchMode::Tags => "tags",
            SearchMode::Folders => "folders",
        }
    }

    /// Modes whose results are never truncated to the result limit.
    #[must_use]
    pub fn shows_all_matches(self) -> bool {
        matches!(self, SearchMode::Tags | SearchMode::Folders | SearchMode::Tabs)
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode prefixes in priority order.
const MODE_PREFIXES: [(&str, SearchMode); 6] = [
    ("h ", SearchMode::History),
    ("b ", SearchMode::Bookmarks),
    ("t ", SearchMode::Tabs),
    ("s ", SearchMode::Search),
    ("#", SearchMode::Tags),
    ("~", SearchMode::Folders),
];

/// Keys that move the selection or leave the popup and must not re-run a search.
const NAVIGATION_KEYS: [&str; 4] = ["ArrowUp", "ArrowDown", "Enter", "Escape"];

const MODIFIER_KEYS: [&str; 3] = ["Control", "Alt", "Shift"];

/// A routed query. An empty term selects the default listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub mode: SearchMode,
    pub term: String,
}

impl Query {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }
}

/// Parse the raw input into `{mode, term}`.
///
/// The input is lower-cased, leading whitespace dropped and runs of spaces
/// collapsed before the mode prefix is matched. The remaining term is trimmed.
#[must_use]
pub fn route(raw: &str) -> Query {
    let normalized = collapse_spaces(&raw.trim_start().to_lowercase());

    let (mode, rest) = MODE_PREFIXES
        .iter()
        .find_map(|(prefix, mode)| normalized.strip_prefix(*prefix).map(|rest| (*mode, rest)))
        .unwrap_or((SearchMode::All, normalized.as_str()));

    Query {
        mode,
        term: rest.trim().to_string(),
    }
}

/// Whether a key event from live typing should trigger a search.
#[must_use]
pub fn is_search_key(key: &str) -> bool {
    !NAVIGATION_KEYS.contains(&key) && !MODIFIER_KEYS.contains(&key)
}

fn collapse_spaces(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_space = false;
    for c in input.chars() {
        if c == ' ' {
            if previous_space {
                continue;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
        out.push(c);
    }
    out
}
