//! C8: idempotent per-index DDL, grounded in
//! `connector/adapter/duckdb_vector_repository.rs::initialize` (VSS bootstrap
//! + HNSW index) and `duckdb_file_hash_repository.rs::initialize_schema`
//! (table-and-index-if-not-exists shape), generalized to per-`index` table
//! names and extended with the symbol columns, the generated keyword column,
//! and the parse-result table this spec adds.

use duckdb::Connection;

use crate::domain::error::CoreError;

use super::EMBEDDING_DIMENSIONS;

pub fn chunk_table_name(index: &str) -> String {
    format!("chunks_{index}")
}

pub fn parse_result_table_name(index: &str) -> String {
    format!("parse_results_{index}")
}

pub fn ensure_vss_extension(conn: &Connection) -> Result<(), CoreError> {
    conn.execute_batch("INSTALL vss; LOAD vss; SET hnsw_enable_experimental_persistence = true;")
        .map_err(|e| CoreError::infrastructure(format!("failed to load vss extension: {e}")))?;
    Ok(())
}

/// Step 1-3 of §4.8: nullable symbol columns, the generated keyword column,
/// and its index, plus the cosine HNSW index on `embedding`.
pub fn ensure_chunk_table(conn: &Connection, index: &str) -> Result<(), CoreError> {
    let table = chunk_table_name(index);
    ensure_vss_extension(conn)?;

    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS "{table}" (
            file_path TEXT NOT NULL,
            start_line INTEGER NOT NULL,
            end_line INTEGER NOT NULL,
            content_text TEXT NOT NULL,
            content_tsv_input TEXT NOT NULL,
            content_tsv TEXT GENERATED ALWAYS AS (' ' || lower(content_tsv_input) || ' ') STORED,
            embedding FLOAT[{dims}],
            block_type TEXT NOT NULL DEFAULT '',
            hierarchy TEXT NOT NULL DEFAULT '',
            language_id TEXT NOT NULL DEFAULT '',
            symbol_type TEXT,
            symbol_name TEXT,
            symbol_signature TEXT,
            PRIMARY KEY (file_path, start_line, end_line)
        );

        CREATE INDEX IF NOT EXISTS "{table}_embedding_hnsw" ON "{table}" USING HNSW (embedding) WITH (metric = 'cosine');
        "#,
        table = table,
        dims = EMBEDDING_DIMENSIONS,
    );
    conn.execute_batch(&ddl).map_err(|e| {
        CoreError::infrastructure(format!("failed to migrate chunk table {table}: {e}"))
    })?;
    Ok(())
}

/// Step 4 of §4.8: the parse-result table plus its `(language, parse_status)` index.
pub fn ensure_parse_result_table(conn: &Connection, index: &str) -> Result<(), CoreError> {
    let table = parse_result_table_name(index);
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS "{table}" (
            file_path TEXT PRIMARY KEY,
            language TEXT NOT NULL,
            parse_status TEXT NOT NULL,
            error_message TEXT
        );

        CREATE INDEX IF NOT EXISTS "{table}_status_idx" ON "{table}" (language, parse_status);
        "#,
        table = table,
    );
    conn.execute_batch(&ddl).map_err(|e| {
        CoreError::infrastructure(format!("failed to migrate parse result table {table}: {e}"))
    })?;
    Ok(())
}

/// `index_metadata(index_name PK, canonical_path, created_at, updated_at, status)` (§6).
pub fn ensure_index_metadata_table(conn: &Connection) -> Result<(), CoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS index_metadata (
            index_name TEXT PRIMARY KEY,
            canonical_path TEXT NOT NULL,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            status TEXT NOT NULL
        );
        "#,
    )
    .map_err(|e| CoreError::infrastructure(format!("failed to migrate index_metadata: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrating_twice_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_chunk_table(&conn, "demo").unwrap();
        ensure_chunk_table(&conn, "demo").unwrap();
        ensure_parse_result_table(&conn, "demo").unwrap();
        ensure_parse_result_table(&conn, "demo").unwrap();
        ensure_index_metadata_table(&conn).unwrap();
        ensure_index_metadata_table(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM chunks_demo", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
