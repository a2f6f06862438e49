//! Exact search engine - simple substring matching

use crate::filter::{matches_filters, searchable_text};
use crate::traits::{check_query, Result, SearchEngine, SearchHit};
use lineage_core::{PaginatedResults, PersonQuery, PersonRecord};

/// Case-insensitive substring search engine (stateless)
pub struct ExactSearchEngine;

impl ExactSearchEngine {
    pub fn new() -> Self {
        Self
    }

    fn matches_query(record: &PersonRecord, query: &PersonQuery) -> bool {
        if !matches_filters(record, query) {
            return false;
        }

        match query.text() {
            Some(text) => searchable_text(record)
                .to_lowercase()
                .contains(&text.to_lowercase()),
            None => true,
        }
    }
}

impl Default for ExactSearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine for ExactSearchEngine {
    fn search(
        &self,
        query: &PersonQuery,
        records: &[PersonRecord],
    ) -> Result<PaginatedResults<SearchHit>> {
        check_query(query)?;

        // Dataset order is kept
        let hits: Vec<SearchHit> = records
            .iter()
            .filter(|record| Self::matches_query(record, query))
            .map(|record| SearchHit {
                record: record.clone(),
                score: 0,
            })
            .collect();

        tracing::debug!("Exact search matched {} records", hits.len());
        Ok(PaginatedResults::paginate(hits, &query.pagination))
    }
}
