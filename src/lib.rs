//! # CocoSearch
//!
//! Indexes a source-code repository into a vector+keyword store and serves
//! semantic, keyword, and hybrid code search over it.
//!
//! ## Architecture
//!
//! - `domain`: language routing, chunking, metadata/keyword rules, and the
//!   plain data model — no I/O.
//! - `application`: the indexing and search use cases, plus the interfaces
//!   (`ChunkStore`, `EmbeddingService`, …) connectors implement.
//! - `connector`: DuckDB storage, the HTTP embedding client, and the
//!   tree-sitter plumbing behind symbol extraction and context expansion.

pub mod application;
pub mod connector;
pub mod domain;

// Re-export commonly used types
pub use application::*;
pub use connector::*;
pub use domain::*;
