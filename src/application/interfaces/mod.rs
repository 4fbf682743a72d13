mod chunk_store;
mod embedding_service;
mod file_hash_repository;
mod index_store;
mod parse_health_store;

pub use chunk_store::*;
pub use embedding_service::*;
pub use file_hash_repository::*;
pub use index_store::*;
pub use parse_health_store::*;
