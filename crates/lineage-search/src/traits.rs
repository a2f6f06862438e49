//! Search engine traits

use lineage_core::limits::validate_free_text;
use lineage_core::{PaginatedResults, PersonQuery, PersonRecord};

pub use crate::error::{SearchError, SearchResult as Result};

/// Result from search including score
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub record: PersonRecord,
    /// Match score; higher is better, 0 for unscored matches
    pub score: u32,
}

/// Trait for search engines
///
/// Engines are stateless and search the records they are handed.
pub trait SearchEngine: Send + Sync {
    /// Search records, returning one page of hits in rank order
    fn search(&self, query: &PersonQuery, records: &[PersonRecord])
        -> Result<PaginatedResults<SearchHit>>;
}

/// Reject query text over the free-text limit
pub(crate) fn check_query(query: &PersonQuery) -> Result<()> {
    if let Some(text) = query.text() {
        validate_free_text("query", text)?;
    }
    Ok(())
}
