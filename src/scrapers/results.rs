//! Search result records and the response shape served to callers.

use serde::{Deserialize, Serialize};

/// One result item as shown on a result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    /// Four-digit year with the surrounding parentheses stripped.
    pub year: String,
    /// Rating, or 0.0 when the item has none.
    pub score: f64,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, year: impl Into<String>, score: f64) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
            score,
        }
    }
}

/// Ordered, append-only results for one query, capped at `limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    items: Vec<SearchResult>,
    limit: usize,
}

impl ResultSet {
    pub fn new(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            limit,
        }
    }

    /// Append a record. Returns false and drops the record if already full.
    pub fn push(&mut self, item: SearchResult) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.limit
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[SearchResult] {
        &self.items
    }

    pub fn into_items(self) -> Vec<SearchResult> {
        self.items
    }
}

/// Serialized form of a finished query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub search_results: Vec<SearchResult>,
    pub size: usize,
}

/// Convert collected results into the response body.
pub fn to_response(results: ResultSet) -> SearchResponse {
    let search_results = results.into_items();
    SearchResponse {
        size: search_results.len(),
        search_results,
    }
}
