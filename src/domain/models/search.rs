use serde::{Deserialize, Serialize};

use super::chunk::{Chunk, SymbolKind};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    pub languages: Vec<String>,
    pub symbol_type: Option<SymbolKind>,
    /// Glob against the symbol's qualified name, e.g. `Owner.*`.
    pub symbol_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub index: String,
    pub text: String,
    pub limit: usize,
    pub min_score: f32,
    pub hybrid: bool,
    pub filters: SearchFilters,
}

impl SearchQuery {
    pub fn new(index: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            text: text.into(),
            limit: 20,
            min_score: 0.0,
            hybrid: false,
            filters: SearchFilters::default(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_hybrid(mut self, hybrid: bool) -> Self {
        self.hybrid = hybrid;
        self
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Vector,
    Keyword,
    Hybrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
    pub match_type: MatchType,
    pub vector_score: Option<f32>,
    pub keyword_score: Option<f32>,
}

impl SearchResult {
    pub fn vector(chunk: Chunk, score: f32) -> Self {
        Self {
            chunk,
            score,
            match_type: MatchType::Vector,
            vector_score: Some(score),
            keyword_score: None,
        }
    }

    pub fn keyword(chunk: Chunk, score: f32) -> Self {
        Self {
            chunk,
            score,
            match_type: MatchType::Keyword,
            vector_score: None,
            keyword_score: Some(score),
        }
    }
}
