//! Search query and response models.

use serde::{Deserialize, Serialize};

use crate::models::Paper;

/// A search request against the arXiv API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text search terms
    pub query: String,

    /// Maximum number of results to return
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Only include papers submitted on or after this date (ISO date, e.g. "2023-01-01")
    pub date_from: Option<String>,

    /// Only include papers submitted on or before this date
    pub date_to: Option<String>,

    /// Restrict to these arXiv categories (e.g. "cs.AI")
    #[serde(default)]
    pub categories: Vec<String>,
}

fn default_max_results() -> usize {
    10
}

impl SearchQuery {
    /// Create a new query with default limits
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: default_max_results(),
            date_from: None,
            date_to: None,
            categories: Vec::new(),
        }
    }

    /// Set the maximum number of results
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the lower submission-date bound
    pub fn date_from(mut self, date: impl Into<String>) -> Self {
        self.date_from = Some(date.into());
        self
    }

    /// Set the upper submission-date bound
    pub fn date_to(mut self, date: impl Into<String>) -> Self {
        self.date_to = Some(date.into());
        self
    }

    /// Add a category filter
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }
}

/// The result of a search: matching papers plus the query that produced them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Number of papers returned
    pub total_results: usize,

    /// The matching papers
    pub papers: Vec<Paper>,

    /// The query string that produced these results
    pub query: String,
}

impl SearchResponse {
    /// Build a response from a list of papers
    pub fn new(papers: Vec<Paper>, query: &str) -> Self {
        Self {
            total_results: papers.len(),
            papers,
            query: query.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_builder() {
        let query = SearchQuery::new("machine learning")
            .max_results(20)
            .date_from("2020-01-01")
            .category("cs.AI");

        assert_eq!(query.query, "machine learning");
        assert_eq!(query.max_results, 20);
        assert_eq!(query.date_from, Some("2020-01-01".to_string()));
        assert_eq!(query.categories, vec!["cs.AI".to_string()]);
    }

    #[test]
    fn test_search_query_defaults() {
        let query = SearchQuery::new("test");
        assert_eq!(query.max_results, 10);
        assert!(query.categories.is_empty());
        assert!(query.date_from.is_none());
    }

    #[test]
    fn test_search_response_counts() {
        let papers = vec![Paper::new(
            "2301.12345".to_string(),
            "Test".to_string(),
            "https://arxiv.org/abs/2301.12345".to_string(),
        )];
        let response = SearchResponse::new(papers, "test");
        assert_eq!(response.total_results, 1);
        assert_eq!(response.query, "test");
    }
}
