//! Search tool implementation
//!
//! Implements the `search(query)` tool shared by CLI and session mode

use crate::cli::SearchArgs;
use crate::dossier::display_id;
use crate::error::{validate_query, AppError};
use crate::search::{MatchSpan, SearchIndex, SearchResult};
use crate::store::{RecordId, RecordStore};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: RecordId,
    pub name: String,
    pub confidence: u8,
    pub spans: Vec<MatchSpan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub hits: Vec<SearchHit>,
}

impl SearchOutput {
    /// Attach record names to ranked results
    pub fn from_results(store: &RecordStore, query: &str, results: Vec<SearchResult>) -> Self {
        let hits = results
            .into_iter()
            .map(|result| SearchHit {
                id: result.id,
                name: store
                    .get(result.id)
                    .map(|record| record.name().to_string())
                    .unwrap_or_default(),
                confidence: result.confidence,
                spans: result.spans,
            })
            .collect();

        Self {
            query: query.to_string(),
            hits,
        }
    }

    pub fn to_text(&self) -> String {
        let status = if self.hits.is_empty() {
            "SCANNING_EMPTY"
        } else {
            "MATCHES_FOUND"
        };
        let mut lines = vec![format!("[SEARCH] QUERY: \"{}\" // {}", self.query, status)];

        for hit in &self.hits {
            lines.push(format!(
                "[MATCH] {:<32} {:>3}% CONF  {}",
                hit.name.to_uppercase(),
                hit.confidence,
                display_id(hit.id)
            ));
        }

        lines.join("\n")
    }
}

/// Execute search tool (shared implementation for session and CLI)
pub fn execute_search(index: &mut SearchIndex, args: &SearchArgs) -> Result<SearchOutput, AppError> {
    validate_query(&args.query)?;

    let mut results = index.search(&args.query);
    if let Some(limit) = args.limit {
        results.truncate(limit);
    }

    info!("Search {:?} returned {} results", args.query, results.len());
    Ok(SearchOutput::from_results(index.store(), &args.query, results))
}
