use once_cell::sync::Lazy;
use regex::Regex;

use super::{strip_leading_comments, ExtractedMetadata, LanguageHandler, MetadataExtractor};

/// The three function-declaration syntaxes Bash accepts, ported from
/// `original_source/.../handlers/bash.py`: `function name {`,
/// `function name() {`, and plain `name() {`.
static FUNCTION_KEYWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*function\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?:\(\))?\s*\{").unwrap());

static FUNCTION_PAREN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*\(\)\s*\{").unwrap());

pub struct BashHandler;

impl MetadataExtractor for BashHandler {
    fn language_id(&self) -> &'static str {
        "bash"
    }

    fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        let stripped = strip_leading_comments(content, |l| l.trim_start().starts_with('#'));
        let first_line = stripped.lines().next().unwrap_or("");

        if let Some(caps) = FUNCTION_KEYWORD_RE
            .captures(first_line)
            .or_else(|| FUNCTION_PAREN_RE.captures(first_line))
        {
            return ExtractedMetadata::new("function", vec![format!("function:{}", &caps[1])]);
        }

        ExtractedMetadata::new("statement", Vec::new())
    }
}

impl LanguageHandler for BashHandler {
    fn matches_filename(&self, filename: &str) -> bool {
        let ext = filename.rsplit('.').next().unwrap_or("");
        matches!(ext, "sh" | "bash") || filename.rsplit('/').next() == Some("bashrc")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_style_function() {
        let meta = BashHandler.extract_metadata("function deploy {\n  echo hi\n}\n");
        assert_eq!(meta.block_type, "function");
        assert_eq!(meta.hierarchy, vec!["function:deploy".to_string()]);
    }

    #[test]
    fn paren_style_function() {
        let meta = BashHandler.extract_metadata("deploy() {\n  echo hi\n}\n");
        assert_eq!(meta.hierarchy, vec!["function:deploy".to_string()]);
    }

    #[test]
    fn keyword_with_parens_style_function() {
        let meta = BashHandler.extract_metadata("function deploy() {\n  echo hi\n}\n");
        assert_eq!(meta.hierarchy, vec!["function:deploy".to_string()]);
    }

    #[test]
    fn leading_comment_is_skipped() {
        let meta = BashHandler.extract_metadata("# Deploy\nfunction deploy_app {\n  echo hi\n}\n");
        assert_eq!(meta.block_type, "function");
        assert_eq!(meta.hierarchy, vec!["function:deploy_app".to_string()]);
    }
}
