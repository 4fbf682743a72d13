use async_trait::async_trait;

use crate::domain::error::CoreError;
use crate::domain::models::Index;

/// Persistence for `Index` lifecycle rows.
#[async_trait]
pub trait IndexStore: Send + Sync {
    async fn upsert(&self, index: &Index) -> Result<(), CoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Index>, CoreError>;

    async fn list(&self) -> Result<Vec<Index>, CoreError>;

    async fn delete(&self, name: &str) -> Result<(), CoreError>;
}
