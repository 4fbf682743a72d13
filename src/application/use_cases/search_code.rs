//! C11: Hybrid Searcher — concurrent vector + keyword arms, RRF fusion,
//! filters, min-score cutoff, a short-TTL per-index query cache. Adapted
//! from the teacher's `SearchCodeUseCase::execute`/`execute_hybrid`,
//! generalized from a single vector repository to the `ChunkStore` trait's
//! split vector/keyword arms. The teacher's cross-encoder reranking
//! (`RerankingService`) has no counterpart in this spec and is dropped.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{ChunkStore, EmbeddingService};
use crate::connector::cache::QueryCache;
use crate::domain::error::CoreError;
use crate::domain::models::{SearchQuery, SearchResult};
use crate::domain::query_analyzer::{has_identifier_pattern, normalize_query_for_keyword};
use crate::domain::validation::validate_query;

use super::rrf_fuse::rrf_fuse;

pub struct SearchCodeUseCase {
    chunk_store: Arc<dyn ChunkStore>,
    embedding_service: Arc<dyn EmbeddingService>,
    cache: Arc<QueryCache>,
}

impl SearchCodeUseCase {
    pub fn new(chunk_store: Arc<dyn ChunkStore>, embedding_service: Arc<dyn EmbeddingService>) -> Self {
        Self::with_cache(chunk_store, embedding_service, Arc::new(QueryCache::new()))
    }

    /// Shares `cache` with the index writer, so indexing can invalidate the
    /// same cache this use case reads from (spec §5 ordering guarantee).
    pub fn with_cache(
        chunk_store: Arc<dyn ChunkStore>,
        embedding_service: Arc<dyn EmbeddingService>,
        cache: Arc<QueryCache>,
    ) -> Self {
        Self {
            chunk_store,
            embedding_service,
            cache,
        }
    }

    pub fn cache(&self) -> Arc<QueryCache> {
        self.cache.clone()
    }

    /// Called by the index writer before any write of an indexing pass
    /// begins, so a re-index never serves stale cached results (spec §5).
    pub async fn invalidate_cache(&self, index: &str) {
        self.cache.invalidate_index(index).await;
    }

    pub async fn execute(&self, query: SearchQuery) -> Result<Vec<SearchResult>, CoreError> {
        validate_query(&query.text)?;

        // `use_hybrid = true` iff the caller asked for it explicitly or the
        // query itself looks identifier-shaped (spec §4.11 "Auto decision").
        let use_hybrid = query.hybrid || has_identifier_pattern(&query.text);

        let cache_key = QueryCache::key(
            &query.index,
            &query.text,
            &query.filters,
            query.limit,
            query.min_score,
            use_hybrid,
        );
        if let Some(cached) = self.cache.get(&cache_key).await {
            debug!("query cache hit for index {}", query.index);
            return Ok(cached);
        }

        let results = if use_hybrid {
            self.execute_hybrid(&query).await?
        } else {
            self.execute_vector_only(&query).await?
        };

        self.cache.put(cache_key, results.clone()).await;
        Ok(results)
    }

    async fn execute_vector_only(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, CoreError> {
        info!("searching index {} for {:?}", query.index, query.text);

        let embedding = self.embedding_service.embed_query(&query.text).await?;
        let mut results = self
            .chunk_store
            .vector_search(&query.index, &embedding, &query.filters, query.limit)
            .await?;

        results.retain(|r| r.score >= query.min_score);
        results.truncate(query.limit);
        Ok(results)
    }

    async fn execute_hybrid(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, CoreError> {
        info!("hybrid searching index {} for {:?}", query.index, query.text);

        // Fetch extra candidates from each arm (K = 4×limit, spec §4.11 step 2)
        // so RRF has a meaningful pool before filters and min_score trim it down.
        let fetch_limit = (query.limit * 4).max(20);
        let normalized = normalize_query_for_keyword(&query.text);
        let embedding = self.embedding_service.embed_query(&query.text).await?;

        let (vector, keyword) = tokio::join!(
            self.chunk_store
                .vector_search(&query.index, &embedding, &query.filters, fetch_limit),
            self.chunk_store
                .keyword_search(&query.index, &normalized, &query.filters, fetch_limit),
        );
        let vector = vector?;
        let keyword = keyword?;

        debug!(
            "hybrid: {} vector + {} keyword candidates",
            vector.len(),
            keyword.len()
        );

        let mut fused = rrf_fuse(vector, keyword, fetch_limit);
        fused.retain(|r| r.score >= query.min_score);
        fused.truncate(query.limit);
        Ok(fused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc as StdArc, Mutex};

    use crate::domain::error::CoreError;
    use crate::domain::models::{Chunk, ChunkLocation, EmbeddingConfig, SearchFilters};

    struct StubChunkStore {
        vector_calls: StdArc<Mutex<u32>>,
        keyword_calls: StdArc<Mutex<u32>>,
    }

    #[async_trait]
    impl ChunkStore for StubChunkStore {
        async fn ensure_schema(&self, _index: &str) -> Result<(), CoreError> {
            Ok(())
        }
        async fn replace_file_chunks(&self, _index: &str, _file_path: &str, _chunks: &[Chunk]) -> Result<(), CoreError> {
            Ok(())
        }
        async fn delete_file_chunks(&self, _index: &str, _file_path: &str) -> Result<u64, CoreError> {
            Ok(0)
        }
        async fn count(&self, _index: &str) -> Result<u64, CoreError> {
            Ok(0)
        }
        async fn vector_search(
            &self,
            _index: &str,
            _query_embedding: &[f32],
            _filters: &SearchFilters,
            _limit: usize,
        ) -> Result<Vec<SearchResult>, CoreError> {
            *self.vector_calls.lock().unwrap() += 1;
            Ok(vec![SearchResult::vector(
                Chunk::new("a.rs", ChunkLocation::new(1, 1), "fn foo() {}", "rust", "function"),
                0.9,
            )])
        }
        async fn keyword_search(
            &self,
            _index: &str,
            _normalized_query: &str,
            _filters: &SearchFilters,
            _limit: usize,
        ) -> Result<Vec<SearchResult>, CoreError> {
            *self.keyword_calls.lock().unwrap() += 1;
            Ok(vec![])
        }
    }

    struct StubEmbedding(EmbeddingConfig);

    #[async_trait]
    impl EmbeddingService for StubEmbedding {
        async fn embed_chunks(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
            Ok(texts.iter().map(|_| vec![0.0; self.0.dimensions()]).collect())
        }
        async fn embed_query(&self, _query: &str) -> Result<Vec<f32>, CoreError> {
            Ok(vec![0.0; self.0.dimensions()])
        }
        fn config(&self) -> &EmbeddingConfig {
            &self.0
        }
    }

    fn use_case() -> (SearchCodeUseCase, StdArc<Mutex<u32>>) {
        let vector_calls = StdArc::new(Mutex::new(0));
        let keyword_calls = StdArc::new(Mutex::new(0));
        let uc = SearchCodeUseCase::new(
            Arc::new(StubChunkStore {
                vector_calls: vector_calls.clone(),
                keyword_calls,
            }),
            Arc::new(StubEmbedding(EmbeddingConfig::default())),
        );
        (uc, vector_calls)
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let (uc, _) = use_case();
        let err = uc.execute(SearchQuery::new("demo", "   ")).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn plain_query_stays_vector_only() {
        let (uc, _) = use_case();
        let results = uc.execute(SearchQuery::new("demo", "how do I connect to the database")).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn identifier_shaped_query_triggers_hybrid() {
        let (uc, _) = use_case();
        let results = uc
            .execute(SearchQuery::new("demo", "find getUserById function").with_min_score(0.0))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn repeated_query_is_served_from_cache() {
        let (uc, vector_calls) = use_case();
        let query = SearchQuery::new("demo", "how do I connect to the database");
        uc.execute(query.clone()).await.unwrap();
        uc.execute(query).await.unwrap();
        // Cache hit means the stub's vector_search only ran once.
        assert_eq!(*vector_calls.lock().unwrap(), 1);
    }
}
