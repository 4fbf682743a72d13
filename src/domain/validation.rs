//! Input validation for index names and search queries.
//!
//! Ported from `original_source/src/cocosearch/validation.py`: index names
//! are constrained to a safe identifier shape so they can be used directly
//! as SQL table/schema name fragments, and queries are capped to a sane
//! length before they ever reach the database.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::error::CoreError;

pub const MAX_INDEX_NAME_LENGTH: usize = 255;
pub const MAX_QUERY_LENGTH: usize = 10_000;

static INDEX_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]+$").expect("static pattern is valid"));

pub fn validate_index_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::validation("index name must not be empty"));
    }
    if name.len() > MAX_INDEX_NAME_LENGTH {
        return Err(CoreError::validation(format!(
            "index name exceeds {MAX_INDEX_NAME_LENGTH} characters"
        )));
    }
    if !INDEX_NAME_PATTERN.is_match(name) {
        return Err(CoreError::validation(
            "index name must match ^[a-z0-9_]+$",
        ));
    }
    Ok(())
}

pub fn validate_query(query: &str) -> Result<(), CoreError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("query must not be empty"));
    }
    if query.chars().count() > MAX_QUERY_LENGTH {
        return Err(CoreError::validation(format!(
            "query exceeds {MAX_QUERY_LENGTH} characters"
        )));
    }
    Ok(())
}
