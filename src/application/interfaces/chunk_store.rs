use async_trait::async_trait;

use crate::domain::error::CoreError;
use crate::domain::models::{Chunk, SearchFilters, SearchResult};

/// Chunk persistence plus the vector and keyword search arms (C7, C8, C11).
///
/// One implementation backs both arms because, in the reference storage
/// substrate, they live in the same table (see DESIGN.md's DuckDB
/// VSS+FTS mapping of the PostgreSQL pgvector/tsvector contract).
#[async_trait]
pub trait ChunkStore: Send + Sync {
    async fn ensure_schema(&self, index: &str) -> Result<(), CoreError>;

    async fn replace_file_chunks(
        &self,
        index: &str,
        file_path: &str,
        chunks: &[Chunk],
    ) -> Result<(), CoreError>;

    async fn delete_file_chunks(&self, index: &str, file_path: &str) -> Result<u64, CoreError>;

    async fn count(&self, index: &str) -> Result<u64, CoreError>;

    async fn vector_search(
        &self,
        index: &str,
        query_embedding: &[f32],
        filters: &SearchFilters,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CoreError>;

    async fn keyword_search(
        &self,
        index: &str,
        normalized_query: &str,
        filters: &SearchFilters,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CoreError>;
}
