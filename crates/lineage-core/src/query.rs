//! Query types for searching person records

use crate::person::Gender;
use serde::{Deserialize, Serialize};

/// Search mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring matching
    #[default]
    Exact,
    /// Fuzzy subsequence matching with scoring
    Fuzzy,
}

/// Pagination options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    /// Page number (0-indexed)
    #[serde(default)]
    pub page: usize,

    /// Number of results per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    100
}

impl Pagination {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size: page_size.clamp(1, 1000),
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }
}

/// Person search query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonQuery {
    /// Text matched against name, location, occupation, spouse and notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default)]
    pub mode: SearchMode,

    /// Only records in this generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Case-insensitive substring of the location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Only records with no death year
    #[serde(default)]
    pub living_only: bool,

    #[serde(default)]
    pub pagination: Pagination,
}

impl PersonQuery {
    /// Create a query matching `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// A query with no text; only the filters apply
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_generation(mut self, generation: i32) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn living_only(mut self) -> Self {
        self.living_only = true;
        self
    }

    pub fn with_pagination(mut self, page: usize, page_size: usize) -> Self {
        self.pagination = Pagination::new(page, page_size);
        self
    }

    /// Query text, trimmed; `None` when blank
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Paginated search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResults<T> {
    /// The data for this page
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationInfo,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub current_page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationInfo {
    pub fn new(current_page: usize, page_size: usize, total_count: usize) -> Self {
        let total_pages = total_count.div_ceil(page_size.max(1));
        Self {
            current_page,
            page_size,
            total_count,
            total_pages,
            has_next_page: current_page + 1 < total_pages,
            has_previous_page: current_page > 0,
        }
    }
}

impl<T> PaginatedResults<T> {
    /// Slice one page out of the full, ordered result list
    pub fn paginate(all: Vec<T>, pagination: &Pagination) -> Self {
        let total = all.len();
        let data = all
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.page_size)
            .collect();
        Self {
            data,
            pagination: PaginationInfo::new(pagination.page, pagination.page_size, total),
        }
    }
}
