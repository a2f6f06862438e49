//! Lineage Search - Search engines for person records
//!
//! Provides exact substring search and fuzzy search (nucleo).

pub mod error;
pub mod exact;
pub mod filter;
pub mod traits;

#[cfg(feature = "fuzzy")]
pub mod fuzzy;

pub use error::{SearchError, SearchResult};
pub use exact::ExactSearchEngine;
pub use traits::{SearchEngine, SearchHit};

#[cfg(feature = "fuzzy")]
pub use fuzzy::FuzzySearchEngine;

use lineage_core::SearchMode;

/// Engine for a search mode
pub fn engine_for(mode: SearchMode) -> SearchResult<Box<dyn SearchEngine>> {
    match mode {
        SearchMode::Exact => Ok(Box::new(ExactSearchEngine::new())),
        #[cfg(feature = "fuzzy")]
        SearchMode::Fuzzy => Ok(Box::new(FuzzySearchEngine::new())),
        #[cfg(not(feature = "fuzzy"))]
        SearchMode::Fuzzy => Err(SearchError::Query(
            "fuzzy search not enabled. Rebuild with --features fuzzy".to_string(),
        )),
    }
}
