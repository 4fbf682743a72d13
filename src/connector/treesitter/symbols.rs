//! C4: runs a grammar's query against chunk text and maps the first match
//! to a canonical [`SymbolMetadata`].
//!
//! Query convention (see `src/connector/queries/*.scm`): the capture tagged
//! `@function`/`@class`/`@method`/`@interface` on a query match is the
//! symbol's defining node; `@name` is its identifier; `@owner`, present
//! only on `@method` matches, is the enclosing class/struct/impl/namespace
//! identifier used to build the qualified `Owner.method` name.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Query, QueryCursor};

use crate::domain::models::{SymbolKind, SymbolMetadata};

use super::{grammar_name_for_extension, parse, resolve_query};

/// No `tree-sitter-dockerfile` grammar is wired (see [`super::ts_language`]),
/// so `FROM … AS <stage>` symbols are pulled with the same regex the
/// metadata extractor uses, mirroring its build-stage-as-definition view.
static DOCKERFILE_FROM_AS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^\s*FROM\s+(?:--platform=\S+\s+)?\S+\s+AS\s+(?P<stage>\S+)\s*$")
        .expect("static pattern is valid")
});

fn extract_dockerfile_symbol(content: &str) -> Option<SymbolMetadata> {
    let line = content.lines().find(|l| DOCKERFILE_FROM_AS_RE.is_match(l))?;
    let stage = DOCKERFILE_FROM_AS_RE.captures(line)?["stage"].to_string();
    Some(SymbolMetadata {
        kind: SymbolKind::Class,
        name: stage,
        signature: Some(line.trim().to_string()),
    })
}

fn symbol_kind_for_capture(capture_name: &str) -> Option<SymbolKind> {
    match capture_name {
        "function" => Some(SymbolKind::Function),
        "class" => Some(SymbolKind::Class),
        "method" => Some(SymbolKind::Method),
        "interface" => Some(SymbolKind::Interface),
        _ => None,
    }
}

/// First line(s) of `node`'s text up to the opening `{`/`:`/`=`, trimmed —
/// the verbatim signature, per spec §4.4.
fn extract_signature(content: &str, node: tree_sitter::Node) -> String {
    let text = &content[node.byte_range()];
    let cut = text
        .find(['{', ':', '='])
        .unwrap_or_else(|| text.find('\n').unwrap_or(text.len()));
    text[..cut].trim().to_string()
}

/// Extracts the first symbol (in document order) from `content`, given the
/// file's extension. Never raises: any parse failure, missing grammar, or
/// query-compile error yields `None`, matching spec §4.4 step 6.
pub fn extract_symbol(
    content: &str,
    extension: &str,
    project_root: Option<&Path>,
) -> Option<SymbolMetadata> {
    let grammar = grammar_name_for_extension(extension)?;
    if grammar == "dockerfile" {
        return extract_dockerfile_symbol(content);
    }
    let (tree, language) = parse(grammar, content)?;
    let query_source = resolve_query(grammar, project_root)?;
    let query = Query::new(&language, &query_source).ok()?;

    let capture_names: Vec<&str> = query.capture_names().to_vec();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), content.as_bytes());

    while let Some(query_match) = matches.next() {
        let mut name: Option<String> = None;
        let mut owner: Option<String> = None;
        let mut main: Option<(tree_sitter::Node, SymbolKind)> = None;

        for capture in query_match.captures {
            let capture_name = capture_names.get(capture.index as usize).copied().unwrap_or("");
            match capture_name {
                "name" => name = Some(content[capture.node.byte_range()].to_string()),
                "owner" => owner = Some(content[capture.node.byte_range()].to_string()),
                other => {
                    if let Some(kind) = symbol_kind_for_capture(other) {
                        main = Some((capture.node, kind));
                    }
                }
            }
        }

        if let (Some((node, kind)), Some(name)) = (main, name) {
            let qualified_name = match (&kind, &owner) {
                (SymbolKind::Method, Some(owner)) => format!("{owner}.{name}"),
                _ => name,
            };
            return Some(SymbolMetadata {
                kind,
                name: qualified_name,
                signature: Some(extract_signature(content, node)),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_rust_function() {
        let symbol = extract_symbol("fn foo(x: i32) -> i32 {\n    x\n}\n", "rs", None).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Function);
        assert_eq!(symbol.name, "foo");
        assert_eq!(symbol.signature.as_deref(), Some("fn foo(x: i32) -> i32"));
    }

    #[test]
    fn extracts_rust_method_with_qualified_name() {
        let src = "impl Widget {\n    fn render(&self) {}\n}\n";
        let symbol = extract_symbol(src, "rs", None).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Method);
        assert_eq!(symbol.name, "Widget.render");
    }

    #[test]
    fn unsupported_extension_returns_none() {
        assert!(extract_symbol("body { color: red; }", "scss", None).is_none());
    }

    #[test]
    fn extracts_dockerfile_build_stage_as_class() {
        let src = "FROM golang:1.21 AS builder\nRUN go build -o app .\n";
        let symbol = extract_symbol(src, "dockerfile", None).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Class);
        assert_eq!(symbol.name, "builder");
    }

    #[test]
    fn dockerfile_without_as_clause_has_no_symbol() {
        assert!(extract_symbol("FROM golang:1.21\nRUN go build -o app .\n", "dockerfile", None).is_none());
    }

    #[test]
    fn unparseable_garbage_never_panics() {
        // Not a crash, just possibly no match — tree-sitter's error recovery
        // still produces a tree for almost any byte stream.
        let _ = extract_symbol("{{{{ not rust at all ]]]", "rs", None);
    }
}
