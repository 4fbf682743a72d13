//! C7's incremental-indexing support: per-file content hashes keyed by
//! index name, adapted from
//! `connector/adapter/duckdb_file_hash_repository.rs` (there keyed by
//! `repository_id`) to this spec's `index`-parameterized
//! `FileHashRepository` trait.

use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::FileHashRepository;
use crate::domain::error::CoreError;
use crate::domain::models::FileHash;

pub struct DuckdbFileHashStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbFileHashStore {
    pub async fn new(conn: Arc<Mutex<Connection>>) -> Result<Self, CoreError> {
        let guard = conn.lock().await;
        Self::ensure_schema(&guard)?;
        drop(guard);
        Ok(Self { conn })
    }

    fn ensure_schema(conn: &Connection) -> Result<(), CoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS file_hashes (
                file_path TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                index_name TEXT NOT NULL,
                PRIMARY KEY (index_name, file_path)
            );

            CREATE INDEX IF NOT EXISTS idx_file_hashes_index ON file_hashes(index_name);
            "#,
        )
        .map_err(|e| CoreError::infrastructure(format!("failed to migrate file_hashes: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl FileHashRepository for DuckdbFileHashStore {
    async fn save_batch(&self, index: &str, hashes: &[FileHash]) -> Result<(), CoreError> {
        if hashes.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| CoreError::infrastructure(format!("failed to begin transaction: {e}")))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR REPLACE INTO file_hashes (file_path, content_hash, index_name) \
                     VALUES (?, ?, ?)",
                )
                .map_err(|e| CoreError::infrastructure(format!("failed to prepare insert: {e}")))?;

            for hash in hashes {
                stmt.execute(params![hash.file_path(), hash.content_hash(), index])
                    .map_err(|e| CoreError::infrastructure(format!("failed to save file hash: {e}")))?;
            }
        }

        tx.commit()
            .map_err(|e| CoreError::infrastructure(format!("failed to commit: {e}")))?;

        debug!("saved {} file hashes for index {}", hashes.len(), index);
        Ok(())
    }

    async fn find_by_index(&self, index: &str) -> Result<Vec<FileHash>, CoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT file_path, content_hash, index_name FROM file_hashes WHERE index_name = ?")
            .map_err(|e| CoreError::infrastructure(format!("failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params![index], |row| {
                Ok(FileHash::new(row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(|e| CoreError::infrastructure(format!("failed to query file hashes: {e}")))?;

        let mut hashes = Vec::new();
        for row in rows {
            hashes.push(row.map_err(|e| CoreError::infrastructure(format!("failed to read row: {e}")))?);
        }
        Ok(hashes)
    }

    async fn delete_by_paths(&self, index: &str, paths: &[String]) -> Result<(), CoreError> {
        if paths.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| CoreError::infrastructure(format!("failed to begin transaction: {e}")))?;

        {
            let mut stmt = tx
                .prepare("DELETE FROM file_hashes WHERE index_name = ? AND file_path = ?")
                .map_err(|e| CoreError::infrastructure(format!("failed to prepare delete: {e}")))?;

            for path in paths {
                stmt.execute(params![index, path])
                    .map_err(|e| CoreError::infrastructure(format!("failed to delete file hash: {e}")))?;
            }
        }

        tx.commit()
            .map_err(|e| CoreError::infrastructure(format!("failed to commit: {e}")))?;

        debug!("deleted {} file hashes for index {}", paths.len(), index);
        Ok(())
    }
}
