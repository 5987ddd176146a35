//! Configuration loading for quickopen.
//!
//! Every tunable weight used by the scorer and the ranker lives here. The
//! resolved [`Config`] is immutable and passed explicitly into each pass.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "QUICKOPEN_CONFIG";

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("The option \"search.strategy\" has an unsupported value: {0}")]
    UnsupportedStrategy(String),
}

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub score: ScoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub tabs: TabsConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default = "default_search_engines")]
    pub search_engines: Vec<SearchEngineConfig>,
}

/// Which match index implementation answers text queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Token prefix matching over an inverted index.
    #[default]
    Precise,
    /// Typo tolerant approximate matching.
    Fuzzy,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::Precise => f.write_str("precise"),
            SearchStrategy::Fuzzy => f.write_str("fuzzy"),
        }
    }
}

impl FromStr for SearchStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "precise" => Ok(SearchStrategy::Precise),
            "fuzzy" => Ok(SearchStrategy::Fuzzy),
            other => Err(ConfigError::UnsupportedStrategy(other.to_string())),
        }
    }
}

/// Search behavior and result limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: SearchStrategy,
    /// Maximum rendered results. Not applied to tab, tag and folder searches.
    pub max_results: usize,
    /// Results scoring below this are dropped.
    pub min_score: f64,
    /// Edit distance tolerated by the fuzzy strategy.
    pub fuzzy_distance: u8,
    /// Browser data snapshot read by the CLI.
    pub snapshot: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::Precise,
            max_results: 32,
            min_score: 30.0,
            fuzzy_distance: 1,
            snapshot: default_snapshot_path(),
        }
    }
}

/// Weights of the scoring rules. A zero value disables the rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub bookmark_base: f64,
    pub tab_base: f64,
    pub history_base: f64,
    pub search_engine_base: f64,

    pub title_weight: f64,
    pub tag_weight: f64,
    pub url_weight: f64,
    pub folder_weight: f64,

    pub exact_includes_bonus: f64,
    pub exact_starts_with_bonus: f64,
    pub exact_equals_bonus: f64,
    pub exact_tag_match_bonus: f64,
    pub exact_folder_match_bonus: f64,

    /// Honor `" +N"` bonus markers in bookmark titles.
    pub custom_bonus: bool,

    pub visited_bonus: f64,
    pub visited_bonus_max: f64,

    pub recent_bonus_max: f64,
    pub recent_bonus_per_hour: f64,

    pub date_added_bonus_max: f64,
    pub date_added_bonus_per_day: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            bookmark_base: 100.0,
            tab_base: 70.0,
            history_base: 45.0,
            search_engine_base: 30.0,
            title_weight: 1.0,
            tag_weight: 0.7,
            url_weight: 0.6,
            folder_weight: 0.5,
            exact_includes_bonus: 5.0,
            exact_starts_with_bonus: 10.0,
            exact_equals_bonus: 20.0,
            exact_tag_match_bonus: 15.0,
            exact_folder_match_bonus: 10.0,
            custom_bonus: true,
            visited_bonus: 0.5,
            visited_bonus_max: 20.0,
            recent_bonus_max: 20.0,
            recent_bonus_per_hour: 0.5,
            date_added_bonus_max: 15.0,
            date_added_bonus_per_day: 0.1,
        }
    }
}

/// Which optional record fields are extracted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub tags: bool,
    pub folder_name: bool,
    pub last_visit: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tags: true,
            folder_name: true,
            last_visit: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    pub only_current_window: bool,
}

/// Browsing history window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub days_ago: u32,
    pub max_items: usize,
    /// URL prefixes never loaded from history.
    pub ignore_list: Vec<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            days_ago: 14,
            max_items: 512,
            ignore_list: Vec::new(),
        }
    }
}

/// A search engine offered as a result for free text queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEngineConfig {
    pub name: String,
    /// URL prefix. A `$s` placeholder is replaced by the query.
    pub url_prefix: String,
    #[serde(default)]
    pub url_suffix: Option<String>,
}

impl SearchEngineConfig {
    fn new(name: &str, url_prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            url_prefix: url_prefix.to_string(),
            url_suffix: None,
        }
    }
}

fn default_search_engines() -> Vec<SearchEngineConfig> {
    vec![
        SearchEngineConfig::new("Google", "https://www.google.com/search?q="),
        SearchEngineConfig::new("Bing", "https://www.bing.com/search?q="),
        SearchEngineConfig::new("DuckDuckGo", "https://duckduckgo.com/?q="),
        SearchEngineConfig::new("dict.cc", "https://www.dict.cc/?s="),
    ]
}

fn default_snapshot_path() -> String {
    ProjectDirs::from("", "", "quickopen").map_or_else(
        || "./snapshot.json".to_string(),
        |dirs| dirs.data_dir().join("snapshot.json").display().to_string(),
    )
}

impl Config {
    /// Load config from `$QUICKOPEN_CONFIG` or ~/.config/quickopen/config.toml,
    /// or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing config file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(path),
            _ => Ok(Config::default()),
        }
    }

    /// Load config from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(source) => return Err(ConfigError::ReadError { path, source }),
        };
        toml::from_str(&contents).map_err(|source| ConfigError::ParseError { path, source })
    }

    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "quickopen").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Snapshot path with `~` expanded.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        expand_tilde(&self.search.snapshot)
    }
}

/// Expand ~ to the user's home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(base_dirs) = BaseDirs::new()
    {
        return base_dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_sections_missing() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.search.strategy, SearchStrategy::Precise);
        assert_eq!(config.search.max_results, 32);
        assert_eq!(config.search_engines.len(), 4);
        assert!(config.display.tags);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            "[search]\nstrategy = \"fuzzy\"\n\n[score]\ntab_base = 80\nexact_equals_bonus = 0\n",
        )
        .unwrap();
        assert_eq!(config.search.strategy, SearchStrategy::Fuzzy);
        assert_eq!(config.search.min_score, 30.0);
        assert_eq!(config.score.tab_base, 80.0);
        assert_eq!(config.score.exact_equals_bonus, 0.0);
        assert_eq!(config.score.bookmark_base, 100.0);
    }

    #[test]
    fn unsupported_strategy_is_rejected() {
        let result = toml::from_str::<Config>("[search]\nstrategy = \"semantic\"\n");
        assert!(result.is_err());

        let err = "semantic".parse::<SearchStrategy>().unwrap_err();
        assert!(err.to_string().contains("unsupported value: semantic"));
    }

    #[test]
    fn search_engines_override() {
        let config: Config = toml::from_str(
            "[[search_engines]]\nname = \"Wiki\"\nurl_prefix = \"https://en.wikipedia.org/w/index.php?search=$s\"\n",
        )
        .unwrap();
        assert_eq!(config.search_engines.len(), 1);
        assert_eq!(config.search_engines[0].name, "Wiki");
        assert_eq!(config.search_engines[0].url_suffix, None);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search\n").unwrap();

        let err = Config::load_from(path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/tmp/x.json"), PathBuf::from("/tmp/x.json"));
        assert_eq!(expand_tilde("rel/x.json"), PathBuf::from("rel/x.json"));
    }
}
