//! C9: after an indexing pass, re-parses every distinct file with
//! tree-sitter and classifies it `ok`/`partial`/`error`/`unsupported`,
//! then truncates and bulk-rewrites the per-index parse-result table in
//! one transaction (spec §4.9). Grounded in the teacher's transactional
//! batch-insert shape (`duckdb_vector_repository.rs::save_batch`); the
//! classification itself has no teacher counterpart since the teacher
//! never tracked parse health, so it's built directly against
//! `connector::treesitter`'s grammar table.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ParseHealthStore;
use crate::connector::treesitter::grammar_name_for_extension;
use crate::domain::error::CoreError;
use crate::domain::models::{ParseResult, ParseStatus};

const MAX_ERROR_LINES: usize = 10;

/// Walks `node`'s subtree and collects 1-based line numbers of error/missing
/// nodes, up to `MAX_ERROR_LINES`, returning whether more were seen.
fn collect_error_lines(node: tree_sitter::Node, lines: &mut Vec<u32>, truncated: &mut bool) {
    if node.is_error() || node.is_missing() {
        if lines.len() < MAX_ERROR_LINES {
            lines.push(node.start_position().row as u32 + 1);
        } else {
            *truncated = true;
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_lines(child, lines, truncated);
    }
}

fn classify(content: &str, extension: &str) -> ParseResult {
    let Some(grammar) = grammar_name_for_extension(extension) else {
        return ParseResult {
            file_path: String::new(),
            language: "unknown".to_string(),
            status: ParseStatus::Unsupported,
            error_message: None,
        };
    };
    let Some((tree, _language)) = crate::connector::treesitter::parse(grammar, content) else {
        return ParseResult {
            file_path: String::new(),
            language: grammar.to_string(),
            status: ParseStatus::Unsupported,
            error_message: None,
        };
    };

    let root = tree.root_node();
    if !root.has_error() {
        return ParseResult::ok("", grammar);
    }

    let mut lines = Vec::new();
    let mut truncated = false;
    collect_error_lines(root, &mut lines, &mut truncated);
    let mut message = lines.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
    if truncated {
        message.push_str(&format!(" +{} more", lines.len().saturating_sub(MAX_ERROR_LINES)));
    }

    ParseResult {
        file_path: String::new(),
        language: grammar.to_string(),
        status: ParseStatus::Partial,
        error_message: Some(message),
    }
}

pub struct ParseHealthUseCase {
    store: Arc<dyn ParseHealthStore>,
}

impl ParseHealthUseCase {
    pub fn new(store: Arc<dyn ParseHealthStore>) -> Self {
        Self { store }
    }

    /// `files` is `(relative_path, content)` for every file the indexing
    /// pass just wrote chunks for (spec §4.9 step 1's "distinct filenames
    /// from chunks_{index}", supplied by the caller rather than re-queried
    /// here since the index writer already has the content in hand).
    pub async fn execute(&self, index: &str, files: &[(String, String)]) -> Result<(), CoreError> {
        self.store.ensure_schema(index).await?;

        let mut results = Vec::with_capacity(files.len());
        for (path, content) in files {
            let extension = Path::new(path).extension().and_then(|e| e.to_str()).unwrap_or("");
            let mut result = classify(content, extension);
            result.file_path = path.clone();
            results.push(result);
        }

        match self.store.replace_all(index, &results).await {
            Ok(()) => info!("parse health updated for {index}: {} files", results.len()),
            Err(e) => warn!("parse health tracking failed for {index}: {e}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_rust_parses_ok() {
        let result = classify("fn foo() {}\n", "rs");
        assert_eq!(result.status, ParseStatus::Ok);
    }

    #[test]
    fn broken_rust_is_partial_with_line_numbers() {
        let result = classify("fn foo( {\n", "rs");
        assert_eq!(result.status, ParseStatus::Partial);
        assert!(result.error_message.is_some());
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let result = classify("whatever", "xyz123");
        assert_eq!(result.status, ParseStatus::Unsupported);
    }

    #[test]
    fn recognised_but_unwired_grammar_is_unsupported() {
        // "json" maps to a grammar name but has no tree_sitter_json dependency.
        let result = classify("{}", "json");
        assert_eq!(result.status, ParseStatus::Unsupported);
    }
}
