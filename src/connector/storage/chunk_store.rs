//! C7 (chunk persistence) and the storage arm of C11 (vector + keyword
//! search), grounded in `connector/adapter/duckdb_vector_repository.rs`'s
//! `save_batch`/`run_semantic`/`run_text`/`search`, generalized from a
//! single `"main"`-namespaced table to one `chunks_{index}` table per index
//! and from 384 to the reference model's 768 dimensions.

use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection, Row};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ChunkStore;
use crate::domain::error::CoreError;
use crate::domain::filters::glob_to_like;
use crate::domain::keyword::preprocess_code_for_tsvector;
use crate::domain::models::{
    Chunk, ChunkLocation, SearchFilters, SearchResult, SymbolKind, SymbolMetadata,
};

use super::migrate;

pub const EMBEDDING_DIMENSIONS: usize = 768;

pub struct DuckdbChunkStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbChunkStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn vector_literal(vector: &[f32]) -> Result<String, CoreError> {
        if vector.len() != EMBEDDING_DIMENSIONS {
            return Err(CoreError::validation(format!(
                "expected {}-dim embedding, got {}",
                EMBEDDING_DIMENSIONS,
                vector.len()
            )));
        }
        let mut literal = String::with_capacity(vector.len() * 8);
        literal.push('[');
        for (i, v) in vector.iter().enumerate() {
            if i > 0 {
                literal.push_str(", ");
            }
            literal.push_str(&v.to_string());
        }
        literal.push(']');
        literal.push_str(&format!("::FLOAT[{}]", EMBEDDING_DIMENSIONS));
        Ok(literal)
    }

    fn symbol_kind_from_str(kind: &str) -> Option<SymbolKind> {
        match kind {
            "function" => Some(SymbolKind::Function),
            "class" => Some(SymbolKind::Class),
            "method" => Some(SymbolKind::Method),
            "interface" => Some(SymbolKind::Interface),
            _ => None,
        }
    }

    fn row_to_chunk(row: &Row) -> Result<Chunk, duckdb::Error> {
        let file_path: String = row.get(0)?;
        let start_line: i64 = row.get(1)?;
        let end_line: i64 = row.get(2)?;
        let content: String = row.get(3)?;
        let language_id: String = row.get(4)?;
        let block_type: String = row.get(5)?;
        let hierarchy_raw: String = row.get(6)?;
        let symbol_type: Option<String> = row.get(7)?;
        let symbol_name: Option<String> = row.get(8)?;
        let symbol_signature: Option<String> = row.get(9)?;

        let hierarchy = if hierarchy_raw.is_empty() {
            Vec::new()
        } else {
            hierarchy_raw.split('/').map(str::to_string).collect()
        };

        let mut chunk = Chunk::new(
            file_path,
            ChunkLocation::new(start_line as u32, end_line as u32),
            content,
            language_id,
            block_type,
        )
        .with_hierarchy(hierarchy);

        if let (Some(kind_str), Some(name)) = (symbol_type, symbol_name) {
            if let Some(kind) = Self::symbol_kind_from_str(&kind_str) {
                chunk = chunk.with_symbol(SymbolMetadata {
                    kind,
                    name,
                    signature: symbol_signature,
                });
            }
        }
        Ok(chunk)
    }

    fn filter_clauses(filters: &SearchFilters) -> Vec<String> {
        let mut clauses = Vec::new();
        if !filters.languages.is_empty() {
            let quoted = filters
                .languages
                .iter()
                .map(|l| format!("'{}'", l.replace('\'', "''")))
                .collect::<Vec<_>>()
                .join(", ");
            clauses.push(format!("language_id IN ({quoted})"));
        }
        if let Some(symbol_type) = &filters.symbol_type {
            clauses.push(format!("symbol_type = '{}'", symbol_type.as_str()));
        }
        if let Some(glob) = &filters.symbol_name {
            let pattern = glob_to_like(glob).replace('\'', "''");
            clauses.push(format!("symbol_name LIKE '{pattern}' ESCAPE '\\'"));
        }
        clauses
    }
}

/// Pads each term with spaces so `content_tsv`'s `LIKE '%…%'` match is a
/// whole-word match, mirroring unstemmed `to_tsvector` semantics.
fn like_escape_term(term: &str) -> String {
    term.to_lowercase()
        .replace('\\', "\\\\")
        .replace('\'', "''")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

const SELECT_COLUMNS: &str = "file_path, start_line, end_line, content_text, language_id, \
    block_type, hierarchy, symbol_type, symbol_name, symbol_signature";

#[async_trait]
impl ChunkStore for DuckdbChunkStore {
    async fn ensure_schema(&self, index: &str) -> Result<(), CoreError> {
        let conn = self.conn.lock().await;
        migrate::ensure_chunk_table(&conn, index)
    }

    async fn replace_file_chunks(
        &self,
        index: &str,
        file_path: &str,
        chunks: &[Chunk],
    ) -> Result<(), CoreError> {
        let table = migrate::chunk_table_name(index);
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| CoreError::infrastructure(format!("failed to begin transaction: {e}")))?;

        tx.execute(
            &format!("DELETE FROM \"{table}\" WHERE file_path = ?"),
            params![file_path],
        )
        .map_err(|e| CoreError::infrastructure(format!("failed to clear file chunks: {e}")))?;

        for chunk in chunks {
            let embedding = chunk.embedding.as_deref().ok_or_else(|| {
                CoreError::internal(format!(
                    "chunk {}:{}-{} has no embedding",
                    chunk.file_path, chunk.location.start_line, chunk.location.end_line
                ))
            })?;
            let array_lit = Self::vector_literal(embedding)?;
            // Handlers already emit one fully keyword-prefixed hierarchy string per chunk.
            let hierarchy = chunk.hierarchy.join("/");
            let tsv_input = preprocess_code_for_tsvector(&chunk.content, &chunk.file_path);
            let (symbol_type, symbol_name, symbol_signature) = match &chunk.symbol {
                Some(symbol) => (
                    Some(symbol.kind.as_str()),
                    Some(symbol.name.as_str()),
                    symbol.signature.as_deref(),
                ),
                None => (None, None, None),
            };

            let sql = format!(
                "INSERT OR REPLACE INTO \"{table}\" \
                (file_path, start_line, end_line, content_text, content_tsv_input, embedding, \
                 block_type, hierarchy, language_id, symbol_type, symbol_name, symbol_signature) \
                 VALUES (?, ?, ?, ?, ?, {array_lit}, ?, ?, ?, ?, ?, ?)"
            );
            tx.execute(
                &sql,
                params![
                    chunk.file_path,
                    chunk.location.start_line as i64,
                    chunk.location.end_line as i64,
                    chunk.content,
                    tsv_input,
                    chunk.block_type,
                    hierarchy,
                    chunk.language_id,
                    symbol_type,
                    symbol_name,
                    symbol_signature,
                ],
            )
            .map_err(|e| CoreError::infrastructure(format!("failed to insert chunk: {e}")))?;
        }

        tx.commit()
            .map_err(|e| CoreError::infrastructure(format!("failed to commit: {e}")))?;

        debug!("replaced {} chunks for {} in {}", chunks.len(), file_path, table);
        Ok(())
    }

    async fn delete_file_chunks(&self, index: &str, file_path: &str) -> Result<u64, CoreError> {
        let table = migrate::chunk_table_name(index);
        let conn = self.conn.lock().await;
        let deleted = conn
            .execute(
                &format!("DELETE FROM \"{table}\" WHERE file_path = ?"),
                params![file_path],
            )
            .map_err(|e| CoreError::infrastructure(format!("failed to delete chunks: {e}")))?;
        Ok(deleted as u64)
    }

    async fn count(&self, index: &str) -> Result<u64, CoreError> {
        let table = migrate::chunk_table_name(index);
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
                row.get(0)
            })
            .map_err(|e| CoreError::infrastructure(format!("failed to count chunks: {e}")))?;
        Ok(count as u64)
    }

    async fn vector_search(
        &self,
        index: &str,
        query_embedding: &[f32],
        filters: &SearchFilters,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CoreError> {
        let table = migrate::chunk_table_name(index);
        let array_lit = Self::vector_literal(query_embedding)?;

        let mut sql = format!(
            "SELECT {SELECT_COLUMNS}, 1.0 - array_cosine_distance(embedding, {array_lit}) AS score \
             FROM \"{table}\""
        );
        let clauses = Self::filter_clauses(filters);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(&format!(
            " ORDER BY array_cosine_distance(embedding, {array_lit}) LIMIT ?"
        ));

        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CoreError::infrastructure(format!("failed to prepare vector search: {e}")))?;
        let mut rows = stmt
            .query(params![limit as i64])
            .map_err(|e| CoreError::infrastructure(format!("failed to run vector search: {e}")))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| CoreError::infrastructure(format!("failed to read vector row: {e}")))?
        {
            let score: f32 = row
                .get(10)
                .map_err(|e| CoreError::infrastructure(format!("failed to read score: {e}")))?;
            let chunk = Self::row_to_chunk(row)
                .map_err(|e| CoreError::infrastructure(format!("failed to parse chunk: {e}")))?;
            results.push(SearchResult::vector(chunk, score));
        }
        Ok(results)
    }

    async fn keyword_search(
        &self,
        index: &str,
        normalized_query: &str,
        filters: &SearchFilters,
        limit: usize,
    ) -> Result<Vec<SearchResult>, CoreError> {
        let terms: Vec<&str> = normalized_query.split_whitespace().collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let table = migrate::chunk_table_name(index);
        let max_score = (terms.len() * 3) as f64;
        let mut score_parts = Vec::new();
        let mut where_parts = Vec::new();

        for term in &terms {
            let escaped = like_escape_term(term);
            score_parts.push(format!(
                "(CASE WHEN content_tsv LIKE '% {s}%' ESCAPE '\\' THEN 1.0 ELSE 0.0 END \
                 + CASE WHEN symbol_name IS NOT NULL AND LOWER(symbol_name) LIKE '%{s}%' ESCAPE '\\' THEN 2.0 ELSE 0.0 END)",
                s = escaped
            ));
            where_parts.push(format!(
                "(content_tsv LIKE '% {s}%' ESCAPE '\\' OR (symbol_name IS NOT NULL AND LOWER(symbol_name) LIKE '%{s}%' ESCAPE '\\'))",
                s = escaped
            ));
        }

        let score_expr = format!("({}) / {:.1}", score_parts.join(" + "), max_score);
        let mut sql = format!(
            "SELECT {SELECT_COLUMNS}, CAST({score_expr} AS FLOAT) AS score FROM \"{table}\" \
             WHERE ({})",
            where_parts.join(" OR ")
        );

        let clauses = Self::filter_clauses(filters);
        if !clauses.is_empty() {
            sql.push_str(&format!(" AND ({})", clauses.join(" AND ")));
        }
        sql.push_str(" ORDER BY score DESC LIMIT ?");

        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CoreError::infrastructure(format!("failed to prepare keyword search: {e}")))?;
        let mut rows = stmt
            .query(params![limit as i64])
            .map_err(|e| CoreError::infrastructure(format!("failed to run keyword search: {e}")))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| CoreError::infrastructure(format!("failed to read keyword row: {e}")))?
        {
            let score: f32 = row
                .get(10)
                .map_err(|e| CoreError::infrastructure(format!("failed to read score: {e}")))?;
            if score == 0.0 {
                continue;
            }
            let chunk = Self::row_to_chunk(row)
                .map_err(|e| CoreError::infrastructure(format!("failed to parse chunk: {e}")))?;
            results.push(SearchResult::keyword(chunk, score));
        }
        Ok(results)
    }
}
