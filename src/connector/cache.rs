//! C11's query cache: short-TTL results keyed by `(index, query, filters,
//! limit, min_score, use_hybrid)`, invalidated per-index before a write of
//! that index begins (spec §4.11 "Caching", §5 ordering guarantee). The
//! teacher has no query cache of its own — this is new surface area
//! required by the spec, built in the teacher's `tokio::sync`-based
//! concurrency idiom rather than reaching for an external cache crate.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::domain::models::{SearchFilters, SearchResult};

const DEFAULT_TTL: Duration = Duration::from_secs(30);

struct Entry {
    results: Vec<SearchResult>,
    expires_at: Instant,
}

pub struct QueryCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn key(
        index: &str,
        query: &str,
        filters: &SearchFilters,
        limit: usize,
        min_score: f32,
        use_hybrid: bool,
    ) -> String {
        format!("{index}\u{1}{query}\u{1}{filters:?}\u{1}{limit}\u{1}{min_score}\u{1}{use_hybrid}")
    }

    pub async fn get(&self, key: &str) -> Option<Vec<SearchResult>> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.results.clone())
    }

    pub async fn put(&self, key: String, results: Vec<SearchResult>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            Entry {
                results,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drops every entry keyed under `index`, wherever it sits in the TTL window.
    pub async fn invalidate_index(&self, index: &str) {
        let prefix = format!("{index}\u{1}");
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| !key.starts_with(&prefix));
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
