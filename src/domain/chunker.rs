//! C2: splits a file's content into byte-bounded, line-addressed pieces.
//!
//! Splitting is hierarchical: try the coarsest separator for the
//! language/grammar first (blank line, say); any resulting piece still
//! over `chunk_size` is recursively split on the next, finer separator;
//! once separators are exhausted, fall back to slicing at `chunk_size`
//! bytes with `chunk_overlap` bytes of trailing context carried into the
//! next piece.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 300;

#[derive(Debug, Clone, Copy)]
pub struct ChunkerConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk {
    pub content: String,
    pub start_line: u32,
    pub end_line: u32,
}

/// Ordered, coarsest-first separators. General source code prefers
/// blank-line (declaration) boundaries; DSL/manifest languages that are
/// already one-statement-per-line fall straight to single newlines.
fn separators_for(language_id: &str) -> &'static [&'static str] {
    match language_id {
        "dockerfile" | "bash" | "hcl" | "helm_values" | "kubernetes" | "docker_compose"
        | "github_actions" | "gitlab_ci" => &["\n\n", "\n"],
        _ => &["\n\n\n", "\n\n", "\n", " "],
    }
}

static TRAILING_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+$").unwrap());

pub fn chunk_content(content: &str, language_id: &str, config: ChunkerConfig) -> Vec<RawChunk> {
    if content.is_empty() {
        return Vec::new();
    }
    let separators = separators_for(language_id);
    let pieces = recursive_split(content, separators, config.chunk_size, config.chunk_overlap);
    pieces
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .map(|piece| {
            let (start_line, end_line) = locate_lines(content, &piece);
            RawChunk {
                content: piece,
                start_line,
                end_line,
            }
        })
        .collect()
}

fn recursive_split(text: &str, separators: &[&str], size: usize, overlap: usize) -> Vec<String> {
    if text.len() <= size {
        return vec![text.to_string()];
    }

    let Some((sep, rest)) = separators.split_first() else {
        return byte_slice_with_overlap(text, size, overlap);
    };

    let parts: Vec<&str> = text.split(sep).collect();
    if parts.len() <= 1 {
        return recursive_split(text, rest, size, overlap);
    }

    let mut merged = Vec::new();
    let mut current = String::new();
    for part in parts {
        let candidate_len = current.len() + sep.len() + part.len();
        if !current.is_empty() && candidate_len > size {
            merged.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str(sep);
        }
        current.push_str(part);
    }
    if !current.is_empty() {
        merged.push(current);
    }

    merged
        .into_iter()
        .flat_map(|piece| {
            if piece.len() > size {
                recursive_split(&piece, rest, size, overlap)
            } else {
                vec![piece]
            }
        })
        .collect()
}

fn byte_slice_with_overlap(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut start = 0usize;
    while start < bytes.len() {
        let end = (start + size).min(bytes.len());
        let end = char_boundary_at_or_before(text, end);
        out.push(text[start..end].to_string());
        if end >= bytes.len() {
            break;
        }
        let next_start = end.saturating_sub(overlap);
        start = char_boundary_at_or_before(text, next_start.max(start + 1));
    }
    out
}

fn char_boundary_at_or_before(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Maps a sub-slice back to 1-based inclusive line numbers within the
/// original content. Falls back to the full range if the slice isn't
/// found verbatim (can happen after overlap slicing splits mid-line).
fn locate_lines(content: &str, piece: &str) -> (u32, u32) {
    let trimmed = TRAILING_WS_RE.replace_all(piece, "");
    match content.find(trimmed.as_ref().trim_start_matches(['\n'])) {
        Some(offset) => {
            let start_line = content[..offset].matches('\n').count() as u32 + 1;
            let end_line = start_line + trimmed.matches('\n').count() as u32;
            (start_line, end_line)
        }
        None => (1, content.matches('\n').count() as u32 + 1),
    }
}
