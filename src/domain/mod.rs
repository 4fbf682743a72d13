//! # Domain Layer
//!
//! Core business models, the language router, chunk splitter, metadata
//! handlers/grammars, keyword preprocessing, and query analysis. This
//! layer has no I/O — everything here is pure computation over strings
//! and in-memory structures.

pub mod chunker;
pub mod error;
pub mod filters;
pub mod grammars;
pub mod handlers;
pub mod keyword;
pub mod models;
pub mod query_analyzer;
pub mod router;
pub mod validation;

pub use error::*;
pub use models::*;
