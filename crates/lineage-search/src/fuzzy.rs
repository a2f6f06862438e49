//! Fuzzy search using nucleo

use nucleo_matcher::{
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
    Config, Matcher, Utf32Str,
};

use crate::filter::{matches_filters, searchable_text};
use crate::traits::{check_query, Result, SearchEngine, SearchHit};
use lineage_core::{PaginatedResults, PersonQuery, PersonRecord};

/// Stateless fuzzy search engine using nucleo
pub struct FuzzySearchEngine {
    /// Hits scoring below this are dropped
    pub min_score: u32,
}

impl FuzzySearchEngine {
    pub fn new() -> Self {
        Self { min_score: 0 }
    }

    pub fn with_min_score(mut self, min_score: u32) -> Self {
        self.min_score = min_score;
        self
    }

    fn score_record(record: &PersonRecord, pattern: &Pattern, matcher: &mut Matcher) -> Option<u32> {
        let searchable = searchable_text(record);
        let mut buf = Vec::new();
        pattern.score(Utf32Str::new(&searchable, &mut buf), matcher)
    }
}

impl Default for FuzzySearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine for FuzzySearchEngine {
    fn search(
        &self,
        query: &PersonQuery,
        records: &[PersonRecord],
    ) -> Result<PaginatedResults<SearchHit>> {
        check_query(query)?;

        let Some(search_text) = query.text() else {
            // No text query, just filter by other criteria
            let hits = records
                .iter()
                .filter(|r| matches_filters(r, query))
                .map(|r| SearchHit {
                    record: r.clone(),
                    score: 0,
                })
                .collect();
            return Ok(PaginatedResults::paginate(hits, &query.pagination));
        };

        let mut matcher = Matcher::new(Config::DEFAULT);
        let pattern = Pattern::new(
            search_text,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );

        // Score and filter records
        let mut scored: Vec<SearchHit> = records
            .iter()
            .filter(|r| matches_filters(r, query))
            .filter_map(|r| {
                Self::score_record(r, &pattern, &mut matcher)
                    .filter(|&score| score >= self.min_score)
                    .map(|score| SearchHit {
                        record: r.clone(),
                        score,
                    })
            })
            .collect();

        // Sort by score descending; ties keep dataset order
        scored.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!("Fuzzy search for '{}' matched {} records", search_text, scored.len());
        Ok(PaginatedResults::paginate(scored, &query.pagination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_core::SearchMode;

    fn records() -> Vec<PersonRecord> {
        vec![
            PersonRecord::new("Jacob Asher").with_generation(1),
            PersonRecord::new("Miriam Levi").with_generation(2),
            PersonRecord::new("Jacqueline Asher").with_generation(2),
        ]
    }

    #[test]
    fn test_fuzzy_search() {
        let search = FuzzySearchEngine::new();
        let query = PersonQuery::new("jcb").with_mode(SearchMode::Fuzzy);
        let results = search.search(&query, &records()).unwrap();

        assert!(results.data.iter().any(|h| h.record.name == "Jacob Asher"));
        assert!(!results.data.iter().any(|h| h.record.name == "Miriam Levi"));
    }

    #[test]
    fn test_fuzzy_search_ranks_and_filters() {
        let search = FuzzySearchEngine::new();
        let query = PersonQuery::new("asher").with_generation(2);
        let results = search.search(&query, &records()).unwrap();

        assert_eq!(results.data.len(), 1);
        assert_eq!(results.data[0].record.name, "Jacqueline Asher");
        assert!(results.data[0].score > 0);
    }

    #[test]
    fn test_sorted_by_score() {
        let search = FuzzySearchEngine::new();
        let results = search.search(&PersonQuery::new("jac"), &records()).unwrap();
        let scores: Vec<u32> = results.data.iter().map(|h| h.score).collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(scores, sorted);
    }

    #[test]
    fn test_empty_text_filters_only() {
        let search = FuzzySearchEngine::new();
        let results = search
            .search(&PersonQuery::empty().with_generation(2), &records())
            .unwrap();
        assert_eq!(results.data.len(), 2);
    }
}
