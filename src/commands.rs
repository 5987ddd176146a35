//! Command implementations shared by CLI and MCP server.
//!
//! [`search`] runs one complete pass: route the query, collect candidates,
//! score, rank, filter and truncate. Each pass owns its [`SearchState`];
//! nothing but the externally owned index survives between passes.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::{Config, SearchStrategy, expand_tilde};
use crate::provider::snapshot::SnapshotProvider;
use crate::provider::{DataProvider, ProviderError, SourceCounts};
use crate::query::{SearchMode, is_search_key, route};
use crate::rank::{SortKey, filter_min_score, sort_results, truncate_results};
use crate::record::{SearchResultItem, now_millis};
use crate::score::calculate_final_score;
use crate::search::engines::search_engine_results;
use crate::search::taxonomy::{search_folders, search_tags};
use crate::search::{MatchIndex, create_match_index};

/// The state of one search pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub mode: SearchMode,
    pub term: String,
    /// Final ranked, filtered and truncated results.
    pub results: Vec<SearchResultItem>,
}

impl SearchState {
    /// Number of results to display.
    #[must_use]
    pub fn count(&self) -> usize {
        self.results.len()
    }
}

/// Run one search pass for the raw input.
///
/// `now` is the Unix time in milliseconds the pass measures ages from.
///
/// # Errors
///
/// Returns an error if the match index fails. No partial result list is
/// returned in that case.
pub fn search(
    raw: &str,
    config: &Config,
    provider: &dyn DataProvider,
    index: &dyn MatchIndex,
    now: f64,
) -> anyhow::Result<SearchState> {
    let started = Instant::now();
    let query = route(raw);
    let mut state = SearchState {
        mode: query.mode,
        term: query.term,
        results: Vec::new(),
    };

    if state.term.is_empty() {
        state.results = provider.default_entries(state.mode);
        calculate_final_score(&mut state.results, &state.term, &config.score, now);
        if matches!(state.mode, SearchMode::History | SearchMode::Tabs) {
            sort_results(&mut state.results, SortKey::LastVisited);
        }
    } else {
        state.results = match state.mode {
            SearchMode::Tags => search_tags(&state.term, &provider.bookmarks()),
            SearchMode::Folders => search_folders(&state.term, &provider.bookmarks()),
            mode => index.search(&state.term, mode)?,
        };
        if matches!(state.mode, SearchMode::All | SearchMode::Search) {
            state
                .results
                .extend(search_engine_results(&state.term, &config.search_engines));
        }
        calculate_final_score(&mut state.results, &state.term, &config.score, now);
        sort_results(&mut state.results, SortKey::Score);
    }

    filter_min_score(&mut state.results, config.search.min_score);
    truncate_results(&mut state.results, state.mode, config.search.max_results);

    debug!(
        "Search for {:?} in mode {} found {} results in {:?}",
        state.term,
        state.mode,
        state.count(),
        started.elapsed()
    );

    Ok(state)
}

/// Run a search pass triggered by a key press while typing.
///
/// Navigation and modifier keys return `None` without searching.
///
/// # Errors
///
/// Returns an error if the search pass fails.
pub fn search_on_key(
    key: &str,
    raw: &str,
    config: &Config,
    provider: &dyn DataProvider,
    index: &dyn MatchIndex,
    now: f64,
) -> anyhow::Result<Option<SearchState>> {
    if !is_search_key(key) {
        return Ok(None);
    }
    search(raw, config, provider, index, now).map(Some)
}

/// Create the configured match index and fill it with every provider record.
///
/// # Errors
///
/// Returns an error if the index cannot be created or built.
pub fn build_index(
    config: &Config,
    provider: &dyn DataProvider,
) -> anyhow::Result<Box<dyn MatchIndex>> {
    let mut index = create_match_index(
        config.search.strategy,
        &config.score,
        config.search.fuzzy_distance,
    )?;
    index.index(&provider.all_records())?;
    Ok(index)
}

/// Load the browser snapshot at `path` or the configured location.
///
/// A missing snapshot means no browser data is available and yields an
/// empty provider.
///
/// # Errors
///
/// Returns an error if an existing snapshot cannot be read or parsed.
pub fn load_provider(
    config: &Config,
    path: Option<&Path>,
    now: f64,
) -> anyhow::Result<SnapshotProvider> {
    let path = path.map_or_else(
        || config.snapshot_path(),
        |p| expand_tilde(&p.to_string_lossy()),
    );

    match SnapshotProvider::load(&path, config, now) {
        Ok(provider) => Ok(provider),
        Err(ProviderError::NotFound(path)) => {
            warn!("No browser data found at {}. Returning no results.", path.display());
            Ok(SnapshotProvider::default())
        }
        Err(e) => Err(anyhow::anyhow!("Load {}: {e}", path.display())),
    }
}

/// Load config and snapshot, build the index and run one search pass.
///
/// # Arguments
///
/// * `query` - The raw query, including any mode prefix
/// * `snapshot` - Snapshot file overriding the configured one
/// * `strategy` - Match strategy overriding the configured one
///
/// # Errors
///
/// Returns an error if config or snapshot loading fails or the search fails.
pub fn run_search(
    query: &str,
    snapshot: Option<PathBuf>,
    strategy: Option<SearchStrategy>,
) -> anyhow::Result<SearchState> {
    let mut config = Config::load()?;
    if let Some(strategy) = strategy {
        config.search.strategy = strategy;
    }

    let now = now_millis();
    let provider = load_provider(&config, snapshot.as_deref(), now)?;
    let index = build_index(&config, &provider)?;
    search(query, &config, &provider, index.as_ref(), now)
}

/// Count the records available per source.
///
/// # Errors
///
/// Returns an error if config or snapshot loading fails.
pub fn sources(snapshot: Option<PathBuf>) -> anyhow::Result<SourceCounts> {
    let config = Config::load()?;
    let provider = load_provider(&config, snapshot.as_deref(), now_millis())?;
    Ok(SourceCounts::of(&provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchEngineConfig;
    use crate::provider::memory::MemoryProvider;
    use crate::record::ResultType;

    const NOW: f64 = 1_700_000_000_000.0;

    fn config() -> Config {
        let mut config = Config::default();
        config.search.min_score = 0.0;
        config.search_engines = vec![SearchEngineConfig {
            name: "Google".to_string(),
            url_prefix: "https://www.google.com/search?q=".to_string(),
            url_suffix: None,
        }];
        config
    }

    fn record(kind: ResultType, title: &str, url: &str) -> SearchResultItem {
        SearchResultItem::new(kind, Some(title.to_string()), url)
    }

    fn provider() -> MemoryProvider {
        let mut tagged = record(ResultType::Bookmark, "Issue Tracker", "https://jira.example.com");
        tagged.tags = Some(vec!["work".to_string()]);
        tagged.folder = Some(vec!["Projects".to_string()]);

        let mut old = record(ResultType::History, "Old Visit", "https://old.example.com");
        old.last_visit_seconds_ago = Some(86_400.0);
        let mut fresh = record(ResultType::History, "Fresh Visit", "https://fresh.example.com");
        fresh.last_visit_seconds_ago = Some(60.0);

        MemoryProvider::new(vec![
            record(ResultType::Bookmark, "Rust Programming Language", "https://www.rust-lang.org"),
            record(ResultType::Tab, "Rust Playground", "https://play.rust-lang.org"),
            tagged,
            old,
            fresh,
        ])
    }

    fn run(raw: &str, config: &Config) -> SearchState {
        let provider = provider();
        let index = build_index(config, &provider).unwrap();
        search(raw, config, &provider, index.as_ref(), NOW).unwrap()
    }

    fn titles(state: &SearchState) -> Vec<&str> {
        state.results.iter().filter_map(|r| r.title.as_deref()).collect()
    }

    #[test]
    fn text_query_ranks_and_appends_search_engines() {
        let state = run("rust", &config());

        assert_eq!(state.mode, SearchMode::All);
        assert_eq!(state.term, "rust");
        assert_eq!(state.results[0].title.as_deref(), Some("Rust Programming Language"));
        assert!(state.results.iter().any(|r| r.kind == ResultType::Search));
        assert!(state.results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn mode_restricts_sources() {
        let state = run("t rust", &config());
        assert_eq!(titles(&state), vec!["Rust Playground"]);

        let state = run("s rust", &config());
        assert_eq!(titles(&state), vec!["Google: \"rust\""]);
    }

    #[test]
    fn tag_and_folder_queries_use_exact_lookup() {
        let state = run("#work", &config());
        assert_eq!(state.mode, SearchMode::Tags);
        assert_eq!(titles(&state), vec!["Issue Tracker"]);
        assert_eq!(state.results[0].search_score, None);

        let state = run("~projects", &config());
        assert_eq!(titles(&state), vec!["Issue Tracker"]);
    }

    #[test]
    fn empty_history_query_lists_most_recent_first() {
        let state = run("h ", &config());
        assert_eq!(state.mode, SearchMode::History);
        assert_eq!(titles(&state), vec!["Fresh Visit", "Old Visit"]);
    }

    #[test]
    fn min_score_and_max_results_apply() {
        let mut config = config();
        config.search.max_results = 1;
        let state = run("rust", &config);
        assert_eq!(state.count(), 1);

        config.search.max_results = 32;
        config.search.min_score = 1_000.0;
        let state = run("rust", &config);
        assert_eq!(state.count(), 0);
    }

    #[test]
    fn navigation_keys_skip_the_pass() {
        let config = config();
        let provider = provider();
        let index = build_index(&config, &provider).unwrap();

        let skipped =
            search_on_key("ArrowDown", "rust", &config, &provider, index.as_ref(), NOW).unwrap();
        assert!(skipped.is_none());

        let ran = search_on_key("t", "rust", &config, &provider, index.as_ref(), NOW).unwrap();
        assert!(ran.is_some_and(|state| state.count() > 0));
    }

    #[test]
    fn missing_snapshot_is_an_empty_provider() {
        let dir = tempfile::TempDir::new().unwrap();
        let provider =
            load_provider(&Config::default(), Some(&dir.path().join("none.json")), NOW).unwrap();
        assert!(provider.all_records().is_empty());
    }
}
