//! C12: enclosing-definition lookup, adapted from
//! `connector/adapter/treesitter_parser.rs`'s `collect_scopes`/
//! `lookup_enclosing_scope` — one tree walk collects every definition-like
//! node's line range, then the tightest range containing a hit's lines
//! wins.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Query, QueryCursor};

use super::{grammar_name_for_extension, parse, resolve_query};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub start_line: u32,
    pub end_line: u32,
    pub name: String,
}

/// All definition-shaped nodes (the same `@function`/`@class`/`@method`/
/// `@interface` captures C4 uses) in `content`, in no particular order.
pub fn collect_scopes(content: &str, extension: &str) -> Vec<Scope> {
    let Some(grammar) = grammar_name_for_extension(extension) else {
        return Vec::new();
    };
    let Some((tree, language)) = parse(grammar, content) else {
        return Vec::new();
    };
    let Some(query_source) = resolve_query(grammar, None) else {
        return Vec::new();
    };
    let Ok(query) = Query::new(&language, &query_source) else {
        return Vec::new();
    };

    let capture_names: Vec<&str> = query.capture_names().to_vec();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), content.as_bytes());

    let mut scopes = Vec::new();
    while let Some(query_match) = matches.next() {
        let mut name: Option<String> = None;
        let mut main: Option<tree_sitter::Node> = None;

        for capture in query_match.captures {
            let capture_name = capture_names.get(capture.index as usize).copied().unwrap_or("");
            match capture_name {
                "name" => name = Some(content[capture.node.byte_range()].to_string()),
                "owner" => {}
                "function" | "class" | "method" | "interface" => main = Some(capture.node),
                _ => {}
            }
        }

        if let (Some(node), Some(name)) = (main, name) {
            scopes.push(Scope {
                start_line: node.start_position().row as u32 + 1,
                end_line: node.end_position().row as u32 + 1,
                name,
            });
        }
    }
    scopes
}

/// The tightest scope containing `[start_line, end_line]`, or `None` if no
/// scope encloses it.
pub fn lookup_enclosing_scope(scopes: &[Scope], start_line: u32, end_line: u32) -> Option<&Scope> {
    scopes
        .iter()
        .filter(|s| s.start_line <= start_line && s.end_line >= end_line)
        .min_by_key(|s| s.end_line - s.start_line)
}
