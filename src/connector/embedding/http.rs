//! Production [`EmbeddingService`]: `POST {endpoint}/embed` with
//! `{model, input}`, expecting `{embeddings: [[f32]]}` back (spec §6).
//!
//! The default endpoint mirrors `original_source/indexer/preflight.py`'s
//! Ollama fallback (`http://localhost:11434`) when no endpoint is
//! configured via the environment.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::EmbeddingService;
use crate::domain::error::CoreError;
use crate::domain::models::EmbeddingConfig;

pub const DEFAULT_EMBEDDING_ENDPOINT: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

pub struct HttpEmbeddingClient {
    client: reqwest::Client,
    endpoint: String,
    config: EmbeddingConfig,
}

impl HttpEmbeddingClient {
    pub fn new(endpoint: impl Into<String>, config: EmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            config,
        }
    }

    async fn embed_batch(&self, input: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embed", self.endpoint.trim_end_matches('/'));
        let request = EmbedRequest {
            model: self.config.model_name(),
            input,
        };

        debug!("Requesting {} embeddings from {}", input.len(), url);

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(CoreError::infrastructure(format!(
                "embedding service returned {}",
                response.status()
            )));
        }

        let parsed: EmbedResponse = response.json().await?;

        if parsed.embeddings.len() != input.len() {
            return Err(CoreError::infrastructure(format!(
                "embedding service returned {} vectors for {} inputs",
                parsed.embeddings.len(),
                input.len()
            )));
        }

        for vector in &parsed.embeddings {
            if vector.len() != self.config.dimensions() {
                return Err(CoreError::infrastructure(format!(
                    "embedding service returned {}-dim vector, expected {}",
                    vector.len(),
                    self.config.dimensions()
                )));
            }
        }

        Ok(parsed.embeddings)
    }
}

#[async_trait]
impl EmbeddingService for HttpEmbeddingClient {
    async fn embed_chunks(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
        self.embed_batch(texts).await
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, CoreError> {
        let batch = self.embed_batch(std::slice::from_ref(&query.to_string())).await?;
        batch
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::infrastructure("embedding service returned no vectors"))
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}
