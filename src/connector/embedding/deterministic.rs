//! A deterministic [`EmbeddingService`] double: same text always yields
//! the same vector, with no external service round-trip.
//!
//! Adapted from the teacher's `MockEmbeddingService`, which seeded
//! `rand::StdRng` from a hash of the input text. Here the vector is
//! derived directly from a `sha2::Sha256` digest of the text, expanded to
//! fill the configured dimension by re-hashing the digest with an
//! incrementing counter — no RNG crate needed, and the derivation is
//! reproducible across platforms and Rust versions.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::application::EmbeddingService;
use crate::domain::error::CoreError;
use crate::domain::models::EmbeddingConfig;

pub struct DeterministicEmbeddingClient {
    config: EmbeddingConfig,
}

impl DeterministicEmbeddingClient {
    pub fn new(config: EmbeddingConfig) -> Self {
        Self { config }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let dims = self.config.dimensions();
        let mut out = Vec::with_capacity(dims);
        let mut counter: u32 = 0;
        while out.len() < dims {
            let mut hasher = Sha256::new();
            hasher.update(text.as_bytes());
            hasher.update(counter.to_le_bytes());
            let digest = hasher.finalize();
            for chunk in digest.chunks(4) {
                if out.len() >= dims {
                    break;
                }
                let mut bytes = [0u8; 4];
                bytes[..chunk.len()].copy_from_slice(chunk);
                // Map a u32 to [-1.0, 1.0] so the resulting vector has a
                // nonzero, non-degenerate magnitude to cosine-normalize.
                let unit = u32::from_le_bytes(bytes) as f32 / u32::MAX as f32;
                out.push(unit * 2.0 - 1.0);
            }
            counter += 1;
        }
        out.truncate(dims);
        normalize(&mut out);
        out
    }
}

fn normalize(vector: &mut [f32]) {
    let magnitude = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for x in vector.iter_mut() {
            *x /= magnitude;
        }
    }
}

#[async_trait]
impl EmbeddingService for DeterministicEmbeddingClient {
    async fn embed_chunks(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, CoreError> {
        Ok(self.embed_one(query))
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_yields_same_vector() {
        let client = DeterministicEmbeddingClient::new(EmbeddingConfig::default());
        let a = client.embed_query("fn foo() {}").await.unwrap();
        let b = client.embed_query("fn foo() {}").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn different_text_yields_different_vectors() {
        let client = DeterministicEmbeddingClient::new(EmbeddingConfig::default());
        let a = client.embed_query("fn foo() {}").await.unwrap();
        let b = client.embed_query("fn bar() {}").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn vectors_have_the_configured_dimension_and_are_normalized() {
        let client = DeterministicEmbeddingClient::new(EmbeddingConfig::default());
        let v = client.embed_query("hello world").await.unwrap();
        assert_eq!(v.len(), client.config().dimensions());
        let magnitude = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn embed_chunks_batches_in_order() {
        let client = DeterministicEmbeddingClient::new(EmbeddingConfig::default());
        let texts = vec!["a".to_string(), "b".to_string()];
        let vectors = client.embed_chunks(&texts).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_ne!(vectors[0], vectors[1]);
    }
}
