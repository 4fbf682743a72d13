//! `Index` lifecycle persistence against `index_metadata` (§6). Deleting an
//! index drops its chunk and parse-result tables too (§3's Index entity
//! invariant), the one place this store reaches past its own table.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use duckdb::{params, Connection};
use tokio::sync::Mutex;

use crate::application::IndexStore;
use crate::domain::error::CoreError;
use crate::domain::models::{Index, IndexStatus};

use super::migrate;

pub struct DuckdbIndexStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbIndexStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub async fn ensure_schema(&self) -> Result<(), CoreError> {
        let conn = self.conn.lock().await;
        migrate::ensure_index_metadata_table(&conn)
    }
}

fn to_epoch_seconds(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() as i64
}

fn from_epoch_seconds(seconds: i64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(seconds.max(0) as u64)
}

fn status_from_str(status: &str) -> IndexStatus {
    match status {
        "indexed" => IndexStatus::Indexed,
        "error" => IndexStatus::Error,
        _ => IndexStatus::Indexing,
    }
}

fn status_as_str(status: IndexStatus) -> &'static str {
    match status {
        IndexStatus::Indexing => "indexing",
        IndexStatus::Indexed => "indexed",
        IndexStatus::Error => "error",
    }
}

#[async_trait]
impl IndexStore for DuckdbIndexStore {
    async fn upsert(&self, index: &Index) -> Result<(), CoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO index_metadata \
             (index_name, canonical_path, created_at, updated_at, status) VALUES (?, ?, ?, ?, ?)",
            params![
                index.name,
                index.canonical_path,
                to_epoch_seconds(index.created_at),
                to_epoch_seconds(index.updated_at),
                status_as_str(index.status),
            ],
        )
        .map_err(|e| CoreError::infrastructure(format!("failed to upsert index metadata: {e}")))?;
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Index>, CoreError> {
        let conn = self.conn.lock().await;
        let result = conn.query_row(
            "SELECT index_name, canonical_path, created_at, updated_at, status \
             FROM index_metadata WHERE index_name = ?",
            params![name],
            |row| {
                let name: String = row.get(0)?;
                let canonical_path: String = row.get(1)?;
                let created_at: i64 = row.get(2)?;
                let updated_at: i64 = row.get(3)?;
                let status: String = row.get(4)?;
                Ok(Index {
                    name,
                    canonical_path,
                    created_at: from_epoch_seconds(created_at),
                    updated_at: from_epoch_seconds(updated_at),
                    status: status_from_str(&status),
                })
            },
        );

        match result {
            Ok(index) => Ok(Some(index)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CoreError::infrastructure(format!(
                "failed to look up index {name}: {e}"
            ))),
        }
    }

    async fn list(&self) -> Result<Vec<Index>, CoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT index_name, canonical_path, created_at, updated_at, status \
                 FROM index_metadata ORDER BY index_name",
            )
            .map_err(|e| CoreError::infrastructure(format!("failed to prepare list: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                let name: String = row.get(0)?;
                let canonical_path: String = row.get(1)?;
                let created_at: i64 = row.get(2)?;
                let updated_at: i64 = row.get(3)?;
                let status: String = row.get(4)?;
                Ok(Index {
                    name,
                    canonical_path,
                    created_at: from_epoch_seconds(created_at),
                    updated_at: from_epoch_seconds(updated_at),
                    status: status_from_str(&status),
                })
            })
            .map_err(|e| CoreError::infrastructure(format!("failed to query indexes: {e}")))?;

        let mut indexes = Vec::new();
        for row in rows {
            indexes.push(row.map_err(|e| CoreError::infrastructure(format!("failed to read row: {e}")))?);
        }
        Ok(indexes)
    }

    async fn delete(&self, name: &str) -> Result<(), CoreError> {
        let conn = self.conn.lock().await;
        let chunk_table = migrate::chunk_table_name(name);
        let parse_table = migrate::parse_result_table_name(name);

        conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS \"{chunk_table}\"; DROP TABLE IF EXISTS \"{parse_table}\";"
        ))
        .map_err(|e| CoreError::infrastructure(format!("failed to drop index tables: {e}")))?;

        conn.execute("DELETE FROM index_metadata WHERE index_name = ?", params![name])
            .map_err(|e| CoreError::infrastructure(format!("failed to delete index metadata: {e}")))?;
        Ok(())
    }
}
