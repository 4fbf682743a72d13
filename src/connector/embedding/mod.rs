//! C6: embedding generation. [`HttpEmbeddingClient`] is the production
//! adapter; [`DeterministicEmbeddingClient`] is the reproducible double
//! used in tests and as the default when indexing/search run without a
//! configured embedding endpoint.

mod deterministic;
mod http;

pub use deterministic::DeterministicEmbeddingClient;
pub use http::{HttpEmbeddingClient, DEFAULT_EMBEDDING_ENDPOINT};
