//! Search index over record names
//!
//! Matches a query against every record's full name and returns at most
//! [`MAX_RESULTS`] results, best first.

use super::fuzzy::{MatchSpan, MatcherKind, NameMatcher};
use super::ranking;
use crate::error::normalize_text;
use crate::store::{RecordId, RecordStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Queries shorter than this (after normalization) are not searched
pub const MIN_QUERY_CHARS: usize = 2;

/// Maximum number of results returned by a search
pub const MAX_RESULTS: usize = 10;

/// One ranked search hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: RecordId,
    /// Final score, lower is better
    pub score: f64,
    /// 0-100, higher is better
    pub confidence: u8,
    /// Matched character ranges of the record's full name
    pub spans: Vec<MatchSpan>,
}

/// Score every name in `corpus` against `query`.
///
/// Candidates are identified by their position in `corpus` and returned best
/// first; equal scores keep corpus order.
pub fn rank_names<'a, I>(matcher: &mut dyn NameMatcher, query: &str, corpus: I) -> Vec<SearchResult>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut results: Vec<SearchResult> = corpus
        .into_iter()
        .enumerate()
        .filter_map(|(id, name)| {
            let name_match = matcher.match_name(query, name)?;
            let score = ranking::final_score(name_match.score, ranking::field_norm(name));
            Some(SearchResult {
                id,
                score,
                confidence: ranking::confidence(score),
                spans: name_match.spans,
            })
        })
        .collect();

    // sort_by is stable: ties stay in corpus order
    results.sort_by(|a, b| a.score.total_cmp(&b.score));
    results
}

/// Fuzzy name search over a record store
pub struct SearchIndex {
    store: Arc<RecordStore>,
    matcher: Box<dyn NameMatcher + Send>,
    limit: usize,
}

impl SearchIndex {
    /// Create an index using the default edit-distance matcher
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self::with_matcher(store, MatcherKind::default().build())
    }

    /// Create an index with a specific matcher
    pub fn with_matcher(store: Arc<RecordStore>, matcher: Box<dyn NameMatcher + Send>) -> Self {
        Self {
            store,
            matcher,
            limit: MAX_RESULTS,
        }
    }

    /// Lower the result cap; values above [`MAX_RESULTS`] are clamped
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(MAX_RESULTS);
        self
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Search record names.
    ///
    /// Returns an empty list without scanning when the normalized query has
    /// fewer than [`MIN_QUERY_CHARS`] characters.
    pub fn search(&mut self, query: &str) -> Vec<SearchResult> {
        let query = normalize_text(query);
        if query.chars().count() < MIN_QUERY_CHARS {
            debug!("Query {:?} too short, skipping scan", query);
            return Vec::new();
        }

        let names = self.store.iter().map(|(_, record)| record.name());
        let mut results = rank_names(self.matcher.as_mut(), &query, names);
        let total = results.len();
        results.truncate(self.limit);

        debug!(
            "Query {:?}: {} matches, returning {}",
            query,
            total,
            results.len()
        );
        results
    }
}
