//! Caller-side query handling for search screens.
//!
//! The index answers any query it is given; these helpers apply the rules of
//! the search UI on top: queries are trimmed, and anything shorter than
//! [`MIN_QUERY_LEN`] characters returns an empty result without loading.

use serde::{Deserialize, Serialize};

use crate::index::{DrugIndex, QueryResult};
use crate::models::{DrugSummary, FilterPage, InteractionReport};

/// Shortest query worth sending to the index.
pub const MIN_QUERY_LEN: usize = 2;

/// Autocomplete suggestions returned per query.
pub const MAX_SUGGESTIONS: usize = 10;

/// Summaries shown on the initial search page.
pub const DEFAULT_LISTING_SIZE: usize = 100;

/// One autocomplete suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub name: String,
    pub identifier: String,
    pub kind: String,
}

/// The first page of the drug list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub drugs: Vec<DrugSummary>,
    pub total_drugs: usize,
    /// Whether more drugs exist than are shown
    pub showing_partial: bool,
}

/// Trimmed query, or `None` if it is too short to search.
pub fn normalize_query(raw: &str) -> Option<&str> {
    let query = raw.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        None
    } else {
        Some(query)
    }
}

/// Suggestions for a search box.
pub fn autocomplete(index: &DrugIndex, raw: &str) -> QueryResult<Vec<Suggestion>> {
    let Some(query) = normalize_query(raw) else {
        return Ok(Vec::new());
    };

    let hits = index.search(query)?;
    Ok(hits
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|hit| Suggestion {
            name: hit.name,
            identifier: hit.identifier,
            kind: hit.kind,
        })
        .collect())
}

/// Filtered drug list for a search box.
pub fn browse(index: &DrugIndex, raw: &str) -> QueryResult<FilterPage> {
    match normalize_query(raw) {
        Some(query) => index.filter_cached(query),
        None => Ok(FilterPage::empty()),
    }
}

/// Interaction check for two entered identifiers.
///
/// Identifiers are trimmed; if either is blank the check is skipped and
/// `None` is returned without loading.
pub fn interactions(
    index: &DrugIndex,
    raw_a: &str,
    raw_b: &str,
) -> QueryResult<Option<InteractionReport>> {
    let (id_a, id_b) = (raw_a.trim(), raw_b.trim());
    if id_a.is_empty() || id_b.is_empty() {
        return Ok(None);
    }
    index.check_interactions(id_a, id_b).map(Some)
}

/// The first `limit` summaries and the size of the whole index.
pub fn listing(index: &DrugIndex, limit: usize) -> QueryResult<Listing> {
    let all = index.all_summaries()?;
    Ok(Listing {
        drugs: all.iter().take(limit).cloned().collect(),
        total_drugs: all.len(),
        showing_partial: all.len() > limit,
    })
}
