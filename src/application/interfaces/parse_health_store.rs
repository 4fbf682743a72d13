use async_trait::async_trait;

use crate::domain::error::CoreError;
use crate::domain::models::ParseResult;

/// Per-index parse-health table (C9).
#[async_trait]
pub trait ParseHealthStore: Send + Sync {
    async fn ensure_schema(&self, index: &str) -> Result<(), CoreError>;

    async fn replace_all(&self, index: &str, results: &[ParseResult]) -> Result<(), CoreError>;

    async fn summary(&self, index: &str) -> Result<Vec<(String, String, u64)>, CoreError>;
}
