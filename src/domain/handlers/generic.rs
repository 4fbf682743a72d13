use once_cell::sync::Lazy;
use regex::Regex;

use super::{strip_hash_comment, ExtractedMetadata, LanguageHandler, MetadataExtractor};

/// Extension → (language_id, line-comment prefix) for the general-purpose
/// source languages covered by a plain tree-sitter grammar (no dedicated
/// DSL-style handler). Falls back to `"text"` for anything unmapped.
const EXTENSION_MAP: &[(&str, &str, &str)] = &[
    ("rs", "rust", "//"),
    ("py", "python", "#"),
    ("js", "javascript", "//"),
    ("jsx", "javascript", "//"),
    ("ts", "typescript", "//"),
    ("tsx", "typescript", "//"),
    ("go", "go", "//"),
    ("php", "php", "//"),
    ("cpp", "cpp", "//"),
    ("cc", "cpp", "//"),
    ("hpp", "cpp", "//"),
    ("c", "c", "//"),
    ("h", "c", "//"),
    ("java", "java", "//"),
    ("rb", "ruby", "#"),
    ("css", "css", "//"),
    ("scss", "css", "//"),
];

static LEADING_KEYWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Heuristic fallback for languages with no DSL-specific handler: report
/// the leading keyword of the first non-comment, non-blank line as the
/// block type, with no hierarchy (symbol-level hierarchy comes from C4's
/// tree-sitter query extraction instead).
pub struct GenericHandler;

fn language_for(filename: &str) -> (&'static str, &'static str) {
    let ext = filename.rsplit('.').next().unwrap_or("");
    EXTENSION_MAP
        .iter()
        .find(|(e, _, _)| *e == ext)
        .map(|(_, lang, comment)| (*lang, *comment))
        .unwrap_or(("text", "#"))
}

impl MetadataExtractor for GenericHandler {
    fn language_id(&self) -> &'static str {
        "text"
    }

    fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        let first_line = content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("");
        let stripped = strip_hash_comment(first_line);
        match LEADING_KEYWORD_RE.captures(stripped) {
            Some(caps) => ExtractedMetadata::new(caps[1].to_string(), Vec::new()),
            None => ExtractedMetadata::new("block", Vec::new()),
        }
    }
}

impl LanguageHandler for GenericHandler {
    fn matches_filename(&self, _filename: &str) -> bool {
        // Last resort: always matches, used as the registry's final entry.
        true
    }
}

/// Resolve the `language_id` a generic-handled file should carry, used by
/// the router once it has decided `GenericHandler` is the match.
pub fn generic_language_id(filename: &str) -> &'static str {
    language_for(filename).0
}
