//! C9 storage arm: truncate-then-bulk-insert rebuild of the per-index
//! parse-result table (spec §4.9 step 3), adapted from the teacher's
//! transactional batch-insert shape in `duckdb_vector_repository.rs::save_batch`.

use std::sync::Arc;

use async_trait::async_trait;
use duckdb::params;
use duckdb::Connection;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ParseHealthStore;
use crate::domain::error::CoreError;
use crate::domain::models::ParseResult;

use super::migrate;

pub struct DuckdbParseHealthStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbParseHealthStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ParseHealthStore for DuckdbParseHealthStore {
    async fn ensure_schema(&self, index: &str) -> Result<(), CoreError> {
        let conn = self.conn.lock().await;
        migrate::ensure_parse_result_table(&conn, index)
    }

    async fn replace_all(&self, index: &str, results: &[ParseResult]) -> Result<(), CoreError> {
        let table = migrate::parse_result_table_name(index);
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| CoreError::infrastructure(format!("failed to begin transaction: {e}")))?;

        tx.execute(&format!("DELETE FROM \"{table}\""), [])
            .map_err(|e| CoreError::infrastructure(format!("failed to truncate {table}: {e}")))?;

        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO \"{table}\" (file_path, language, parse_status, error_message) \
                     VALUES (?, ?, ?, ?)"
                ))
                .map_err(|e| CoreError::infrastructure(format!("failed to prepare insert: {e}")))?;

            for result in results {
                stmt.execute(params![
                    result.file_path,
                    result.language,
                    result.status.as_str(),
                    result.error_message,
                ])
                .map_err(|e| CoreError::infrastructure(format!("failed to insert parse result: {e}")))?;
            }
        }

        tx.commit()
            .map_err(|e| CoreError::infrastructure(format!("failed to commit: {e}")))?;

        debug!("rebuilt {} with {} rows", table, results.len());
        Ok(())
    }

    async fn summary(&self, index: &str) -> Result<Vec<(String, String, u64)>, CoreError> {
        let table = migrate::parse_result_table_name(index);
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT language, parse_status, COUNT(*) FROM \"{table}\" GROUP BY language, parse_status"
            ))
            .map_err(|e| CoreError::infrastructure(format!("failed to prepare summary: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                let language: String = row.get(0)?;
                let status: String = row.get(1)?;
                let count: i64 = row.get(2)?;
                Ok((language, status, count as u64))
            })
            .map_err(|e| CoreError::infrastructure(format!("failed to query summary: {e}")))?;

        let mut summary = Vec::new();
        for row in rows {
            summary.push(row.map_err(|e| CoreError::infrastructure(format!("failed to read row: {e}")))?);
        }
        Ok(summary)
    }
}
