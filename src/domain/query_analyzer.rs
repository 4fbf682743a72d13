//! C10: decides whether a search query looks enough like a code
//! identifier to auto-trigger hybrid mode, and normalizes queries so the
//! keyword arm can match split identifiers. Ported from
//! `original_source/src/cocosearch/search/query_analyzer.py`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::keyword::split_code_identifier;

static SNAKE_CASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*(_[a-z0-9]+)+$").unwrap());
static CAMEL_CASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap());
static PASCAL_CASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap());
static LOWER_TO_UPPER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z][A-Z]").unwrap());
static UPPER_LOWER_UPPER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][a-z]+[A-Z]").unwrap());
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap());

/// True when `word` reads as a code identifier rather than a natural
/// language word: any-length snake_case, camelCase of at least 6
/// characters with a lowercase→uppercase transition, or PascalCase of at
/// least 8 characters with an uppercase→lowercase→uppercase transition.
fn should_split_identifier(word: &str) -> bool {
    if SNAKE_CASE_RE.is_match(word) {
        return true;
    }
    if word.len() >= 6 && CAMEL_CASE_RE.is_match(word) && LOWER_TO_UPPER_RE.is_match(word) {
        return true;
    }
    if word.len() >= 8 && PASCAL_CASE_RE.is_match(word) && UPPER_LOWER_UPPER_RE.is_match(word) {
        return true;
    }
    false
}

/// Whether any word in the query reads as a code identifier — used to
/// auto-trigger hybrid search for identifier-shaped queries even when the
/// caller didn't explicitly ask for hybrid mode.
pub fn has_identifier_pattern(query: &str) -> bool {
    WORD_RE
        .find_iter(query)
        .any(|m| should_split_identifier(m.as_str()))
}

/// Expands identifier-shaped words into their split form (`getUserById` →
/// `get user by id getUserById`) while leaving natural-language text
/// untouched, so the keyword arm can match either the split words or the
/// identifier verbatim.
pub fn normalize_query_for_keyword(query: &str) -> String {
    let mut out = String::new();
    let mut last_end = 0;

    for m in WORD_RE.find_iter(query) {
        out.push_str(&query[last_end..m.start()]);
        let word = m.as_str();
        if should_split_identifier(word) {
            // split_code_identifier's first element is `word` itself, appended verbatim below.
            let sub_tokens: Vec<String> = split_code_identifier(word)
                .into_iter()
                .skip(1)
                .map(|t| t.to_lowercase())
                .collect();
            out.push_str(&sub_tokens.join(" "));
            out.push(' ');
            out.push_str(word);
        } else {
            out.push_str(word);
        }
        last_end = m.end();
    }
    out.push_str(&query[last_end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_snake_case_of_any_length() {
        assert!(has_identifier_pattern("user_id"));
    }

    #[test]
    fn detects_long_enough_camel_case() {
        assert!(has_identifier_pattern("getUserById"));
        assert!(!has_identifier_pattern("myVar"));
    }

    #[test]
    fn detects_long_enough_pascal_case() {
        assert!(has_identifier_pattern("UserAccountService"));
        assert!(!has_identifier_pattern("MyType"));
    }

    #[test]
    fn plain_english_does_not_trigger() {
        assert!(!has_identifier_pattern("how do I connect to the database"));
    }

    #[test]
    fn normalize_expands_identifiers_and_preserves_text() {
        let normalized = normalize_query_for_keyword("find getUserById please");
        assert!(normalized.contains("get user by id"));
        assert!(normalized.contains("getUserById"));
        assert!(normalized.contains("find"));
        assert!(normalized.contains("please"));
    }
}
