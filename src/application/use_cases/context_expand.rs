//! C12: given a hit's `(file_path, start_line, end_line)`, expands it to
//! its enclosing definition when tree-sitter can find one, otherwise
//! falls back to a plain line window. Adapted from
//! `original_source/.../search/context_expander.py`; the tightest-scope
//! lookup itself lives in `connector::treesitter::scopes` (shared with
//! C4) and is reused here rather than duplicated.

use std::path::Path;
use std::sync::Arc;

use crate::connector::treesitter::{lookup_enclosing_scope, FileCache};

pub const LINE_BUDGET: usize = 50;
const FALLBACK_WINDOW: u32 = 10;
const MAX_LINE_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedContext {
    pub start_line: u32,
    pub end_line: u32,
    pub lines: Vec<String>,
}

pub struct ContextExpandUseCase {
    cache: Arc<FileCache>,
}

impl ContextExpandUseCase {
    pub fn new(cache: Arc<FileCache>) -> Self {
        Self { cache }
    }

    pub fn execute(&self, file_path: &str, content: &str, start_line: u32, end_line: u32) -> ExpandedContext {
        let extension = Path::new(file_path).extension().and_then(|e| e.to_str()).unwrap_or("");
        let scopes = self.cache.scopes_for(file_path, content, extension);

        let (expanded_start, expanded_end) = match lookup_enclosing_scope(&scopes, start_line, end_line) {
            Some(scope) => clamp_to_budget(scope.start_line, scope.end_line, start_line, end_line),
            None => fallback_window(start_line, end_line, line_count(content)),
        };

        render(content, expanded_start, expanded_end)
    }
}

/// Keeps the hit centered and truncates symmetrically if the scope's own
/// range exceeds the budget (spec §4.12 step 3).
fn clamp_to_budget(scope_start: u32, scope_end: u32, hit_start: u32, hit_end: u32) -> (u32, u32) {
    let span = scope_end.saturating_sub(scope_start) + 1;
    if span as usize <= LINE_BUDGET {
        return (scope_start, scope_end);
    }

    let half = (LINE_BUDGET as u32) / 2;
    let center = hit_start.saturating_add(hit_end) / 2;
    let mut start = center.saturating_sub(half).max(scope_start);
    let mut end = (start + LINE_BUDGET as u32 - 1).min(scope_end);
    if end - start + 1 < LINE_BUDGET as u32 {
        start = end.saturating_sub(LINE_BUDGET as u32 - 1).max(scope_start);
    }
    (start, end)
}

fn fallback_window(start_line: u32, end_line: u32, total_lines: u32) -> (u32, u32) {
    let start = start_line.saturating_sub(FALLBACK_WINDOW).max(1);
    let end = (end_line + FALLBACK_WINDOW).min(total_lines.max(end_line));
    (start, end)
}

fn line_count(content: &str) -> u32 {
    content.lines().count() as u32
}

fn render(content: &str, start_line: u32, end_line: u32) -> ExpandedContext {
    let lines: Vec<String> = content
        .lines()
        .enumerate()
        .filter(|(i, _)| {
            let line_no = *i as u32 + 1;
            line_no >= start_line && line_no <= end_line
        })
        .map(|(_, line)| truncate_line(line))
        .collect();
    ExpandedContext {
        start_line,
        end_line,
        lines,
    }
}

fn truncate_line(line: &str) -> String {
    if line.chars().count() <= MAX_LINE_CHARS {
        return line.to_string();
    }
    let truncated: String = line.chars().take(MAX_LINE_CHARS).collect();
    format!("{truncated}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn use_case() -> ContextExpandUseCase {
        ContextExpandUseCase::new(Arc::new(FileCache::new()))
    }

    #[test]
    fn expands_to_enclosing_function() {
        let content = "fn outer() {\n    let x = 1;\n    x + 1\n}\n";
        let result = use_case().execute("a.rs", content, 2, 2);
        assert_eq!(result.start_line, 1);
        assert_eq!(result.end_line, 4);
        assert_eq!(result.lines[0], "fn outer() {");
    }

    #[test]
    fn falls_back_to_window_for_unsupported_language() {
        let content = (1..=30).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n");
        let result = use_case().execute("a.scss", &content, 15, 15);
        assert_eq!(result.start_line, 5);
        assert_eq!(result.end_line, 25);
    }

    #[test]
    fn truncates_long_lines_with_ellipsis() {
        let long_line = "x".repeat(MAX_LINE_CHARS + 50);
        let content = format!("fn f() {{\n{long_line}\n}}\n");
        let result = use_case().execute("a.rs", &content, 2, 2);
        let rendered = &result.lines[1];
        assert!(rendered.ends_with('…'));
        assert_eq!(rendered.chars().count(), MAX_LINE_CHARS + 1);
    }
}
