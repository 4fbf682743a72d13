use async_trait::async_trait;

use crate::domain::error::CoreError;
use crate::domain::models::FileHash;

/// Persistence for file content hashes, used by C7 to classify files as
/// added/modified/deleted/unchanged between indexing runs.
#[async_trait]
pub trait FileHashRepository: Send + Sync {
    async fn save_batch(&self, index: &str, hashes: &[FileHash]) -> Result<(), CoreError>;

    async fn find_by_index(&self, index: &str) -> Result<Vec<FileHash>, CoreError>;

    async fn delete_by_paths(&self, index: &str, paths: &[String]) -> Result<(), CoreError>;
}
