//! Search engine results offered for free text queries.

use crate::config::SearchEngineConfig;
use crate::record::{ResultType, SearchResultItem};

/// Placeholder in a URL prefix replaced by the encoded query.
const QUERY_PLACEHOLDER: &str = "$s";

/// One `search` record per configured engine for `term`.
#[must_use]
pub fn search_engine_results(term: &str, engines: &[SearchEngineConfig]) -> Vec<SearchResultItem> {
    engines
        .iter()
        .map(|engine| {
            let url = engine_url(engine, term);
            SearchResultItem::new(
                ResultType::Search,
                Some(format!("{}: \"{term}\"", engine.name)),
                &url,
            )
        })
        .collect()
}

fn engine_url(engine: &SearchEngineConfig, term: &str) -> String {
    let encoded = urlencoding::encode(term);
    let mut url = if engine.url_prefix.contains(QUERY_PLACEHOLDER) {
        engine.url_prefix.replace(QUERY_PLACEHOLDER, &encoded)
    } else {
        format!("{}{encoded}", engine.url_prefix)
    };
    if let Some(suffix) = &engine.url_suffix {
        url.push_str(suffix);
    }
    url
}
