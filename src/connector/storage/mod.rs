//! C7/C8/C9/C11 storage arm: DuckDB-backed implementations of the
//! `application::interfaces` traits.
//!
//! The source implementation's storage contract (§6) is PostgreSQL-shaped:
//! pgvector cosine distance plus a generated `tsvector`/GIN inverted index.
//! DuckDB has no `tsvector` type, so `content_tsv` here is a real generated
//! column (`GENERATED ALWAYS AS ... STORED`) holding a word-padded lowercase
//! copy of `content_tsv_input`, and the keyword arm matches against it with
//! per-term `LIKE '% term %'` scoring — the same whole-word matching the
//! teacher's `duckdb_vector_repository.rs::run_text` already did against raw
//! content, just now scored against the preprocessed token stream instead.
//! Vector search keeps the teacher's `vss` extension + HNSW cosine index
//! unchanged, just re-parameterized per index name and widened to 768 dims.

mod chunk_store;
mod file_hash_store;
mod index_store;
pub mod migrate;
mod parse_health_store;

pub use chunk_store::{DuckdbChunkStore, EMBEDDING_DIMENSIONS};
pub use file_hash_store::DuckdbFileHashStore;
pub use index_store::DuckdbIndexStore;
pub use parse_health_store::DuckdbParseHealthStore;
