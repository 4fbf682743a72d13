//! C5: keyword preprocessing feeding the keyword search arm — splitting
//! identifiers into their constituent words so `getUserById` is
//! discoverable by searching `user` or `by id`. Ported from
//! `original_source/src/cocosearch/indexer/tsvector.py`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a lowercase→uppercase transition (`getUser` → split before `U`).
static CAMEL_BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
/// Matches an acronym→word transition (`HTTPServer` → split before `Server`).
static ACRONYM_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());

/// Splits a single code identifier into its constituent words, handling
/// `camelCase`, `PascalCase`, `snake_case`, and `kebab-case` uniformly.
/// Always emits the original token first, case preserved — callers that
/// want case-insensitive matching lowercase downstream, at the point
/// they feed a tsvector/query string (the DB's generated `content_tsv`
/// column already lowercases on write, so most callers never need to).
///
/// `getUserByID` → `["getUserByID", "get", "User", "By", "ID"]`
/// `user_id` → `["user_id", "user", "id"]`
pub fn split_code_identifier(identifier: &str) -> Vec<String> {
    let mut tokens = vec![identifier.to_string()];

    let with_acronym_split = ACRONYM_BOUNDARY_RE.replace_all(identifier, "$1 $2");
    let with_camel_split = CAMEL_BOUNDARY_RE.replace_all(&with_acronym_split, "$1 $2");
    let camel_parts: Vec<String> = with_camel_split.split_whitespace().map(str::to_string).collect();
    if camel_parts.len() > 1 {
        tokens.extend(camel_parts);
    }

    if identifier.contains('_') || identifier.contains('-') {
        let snake_parts: Vec<String> = identifier
            .split(|c: char| c == '_' || c == '-')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if snake_parts.len() > 1 {
            tokens.extend(snake_parts);
        }
    }

    tokens
}

/// Splits a filename/path into search tokens: path components on `/`,
/// each further split on `.`, `_`, `-`, each sub-component camel-split and
/// lowercased. Leading dots on a component (dotfiles) are stripped first.
pub fn extract_filename_tokens(path: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for component in path.split('/') {
        let component = component.trim_start_matches('.');
        for part in component.split(['.', '_', '-']) {
            if part.is_empty() {
                continue;
            }
            tokens.extend(split_code_identifier(part).into_iter().map(|t| t.to_lowercase()));
        }
    }
    tokens
}

/// Produces the text that is fed into the keyword index for a chunk: the
/// raw content plus the identifier-split tokens of both the content's
/// words and the file path, deduplicated in first-seen order.
pub fn preprocess_code_for_tsvector(content: &str, file_path: &str) -> String {
    let mut seen = std::collections::HashSet::new();
    let mut out_tokens: Vec<String> = Vec::new();

    let mut push_unique = |tok: String| {
        if seen.insert(tok.clone()) {
            out_tokens.push(tok);
        }
    };

    for word in content.split(|c: char| !c.is_alphanumeric() && c != '_') {
        if word.is_empty() {
            continue;
        }
        push_unique(word.to_lowercase());
        for sub in split_code_identifier(word) {
            push_unique(sub);
        }
    }

    for tok in extract_filename_tokens(file_path) {
        push_unique(tok);
    }

    out_tokens.join(" ")
}
