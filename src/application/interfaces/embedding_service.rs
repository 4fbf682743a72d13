use async_trait::async_trait;

use crate::domain::error::CoreError;
use crate::domain::models::EmbeddingConfig;

/// Generates vector embeddings from chunk text and search queries (C6).
///
/// Implementations must be deterministic: the same input text always
/// produces the same vector, so indexing and tests are reproducible.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Embed chunk content. `context_prefix` is typically
    /// `"File: {filename}\n"`, prepended so the embedding captures the
    /// chunk's file context.
    async fn embed_chunks(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CoreError>;

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, CoreError>;

    fn config(&self) -> &EmbeddingConfig;
}
