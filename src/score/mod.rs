//! Composite relevance scoring.
//!
//! A record's final score starts from a per-type base, is weighted by the
//! match confidence the index reported, and then collects independent bonuses
//! for exact text matches, tags, folders, visit frequency and recency.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::config::ScoreConfig;
use crate::record::{ResultType, SearchResultItem};

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;

/// `" +N"` marker in a bookmark title granting `N` extra points.
#[allow(clippy::unwrap_used)]
static CUSTOM_BONUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ ][+]([0-9]+)").unwrap());

/// Base score for a record type.
#[must_use]
pub fn base_score(kind: ResultType, config: &ScoreConfig) -> f64 {
    match kind {
        ResultType::Bookmark => config.bookmark_base,
        ResultType::Tab => config.tab_base,
        ResultType::History => config.history_base,
        ResultType::Search => config.search_engine_base,
    }
}

/// Compute the final score of every item for `term`.
///
/// `now` is the Unix time in milliseconds the bookmark ages are measured
/// from. The result only depends on the arguments, so scoring the same
/// input twice yields identical scores.
pub fn calculate_final_score(
    items: &mut [SearchResultItem],
    term: &str,
    config: &ScoreConfig,
    now: f64,
) {
    let url_term = term.split(' ').collect::<Vec<_>>().join("-");
    for item in items.iter_mut() {
        item.score = score_item(item, term, &url_term, config, now);
    }
}

#[allow(clippy::float_cmp)]
fn enabled(weight: f64) -> bool {
    weight != 0.0
}

fn score_item(
    item: &mut SearchResultItem,
    term: &str,
    url_term: &str,
    config: &ScoreConfig,
    now: f64,
) -> f64 {
    let mut score = base_score(item.kind, config);

    // Weaker matches from the index pull the score down. Exact structural
    // matches carry no confidence and count as a full title match.
    score *= item.search_score.unwrap_or(config.title_weight);

    if enabled(config.exact_includes_bonus) {
        let title = item.title_lower();
        for token in term.split(' ').filter(|t| !t.is_empty()) {
            if title.as_deref().is_some_and(|t| t.contains(token)) {
                score += config.exact_includes_bonus * config.title_weight;
            } else if item.url.contains(url_term) {
                score += config.exact_includes_bonus * config.url_weight;
            }
        }
    }

    if config.custom_bonus && item.kind == ResultType::Bookmark {
        score += take_custom_bonus(item);
    }

    if !term.is_empty() {
        let title = item.title_lower();

        if enabled(config.exact_starts_with_bonus) {
            if title.as_deref().is_some_and(|t| t.starts_with(term)) {
                score += config.exact_starts_with_bonus * config.title_weight;
            } else if item.url.starts_with(url_term) {
                score += config.exact_starts_with_bonus * config.url_weight;
            }
        }

        if enabled(config.exact_equals_bonus) && title.as_deref() == Some(term) {
            score += config.exact_equals_bonus;
        }

        if enabled(config.exact_tag_match_bonus)
            && let Some(tags) = &item.tags
        {
            score += config.exact_tag_match_bonus * count_exact_matches(term, '#', tags);
        }

        if enabled(config.exact_folder_match_bonus)
            && let Some(folders) = &item.folder
        {
            score += config.exact_folder_match_bonus * count_exact_matches(term, '~', folders);
        }
    }

    if enabled(config.visited_bonus)
        && let Some(visits) = item.visit_count.filter(|v| *v > 0)
    {
        score += config
            .visited_bonus_max
            .min(f64::from(visits) * config.visited_bonus);
    }

    if enabled(config.recent_bonus_max)
        && enabled(config.recent_bonus_per_hour)
        && let Some(seconds_ago) = item.last_visit_seconds_ago
    {
        let hours_ago = seconds_ago / SECONDS_PER_HOUR;
        score += (config.recent_bonus_max - hours_ago * config.recent_bonus_per_hour).max(0.0);
    }

    if enabled(config.date_added_bonus_max)
        && enabled(config.date_added_bonus_per_day)
        && let Some(date_added) = item.date_added
    {
        let days_ago = (now - date_added) / MILLIS_PER_DAY;
        score += (config.date_added_bonus_max - days_ago * config.date_added_bonus_per_day).max(0.0);
    }

    score
}

/// Strip the first `" +N"` marker from the title and return `N`.
fn take_custom_bonus(item: &mut SearchResultItem) -> f64 {
    let Some(title) = item.title.as_mut() else {
        return 0.0;
    };
    let Some(caps) = CUSTOM_BONUS.captures(title.as_str()) else {
        return 0.0;
    };

    let Some(whole) = caps.get(0) else {
        return 0.0;
    };
    let range = whole.range();
    let bonus = match caps.get(1).map(|m| m.as_str().parse::<u32>()) {
        Some(Ok(value)) => f64::from(value),
        Some(Err(e)) => {
            warn!("Unexpected custom bonus score in {title:?}: {e}");
            0.0
        }
        None => {
            warn!("Unexpected custom bonus score match in {title:?}");
            0.0
        }
    };

    title.replace_range(range, "");
    bonus
}

/// Count `(token, value)` pairs where a `delimiter`-prefixed token of the
/// term equals one of `values`. The segment before the first delimiter is
/// not a token.
fn count_exact_matches(term: &str, delimiter: char, values: &[String]) -> f64 {
    if !term.contains(delimiter) {
        return 0.0;
    }

    let mut matches = 0u32;
    for token in term.split(delimiter).skip(1).map(str::trim) {
        if token.is_empty() {
            continue;
        }
        for value in values {
            if token == value.to_lowercase() {
                matches += 1;
            }
        }
    }
    f64::from(matches)
}
