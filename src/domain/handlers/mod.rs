//! C1/C3: per-language metadata extraction for files that are *not* picked
//! up by a content-gated [`crate::domain::grammars::GrammarHandler`].
//!
//! A [`LanguageHandler`] matches purely on filename (a fixed name like
//! `Dockerfile`, or an extension) — unlike a grammar, it never inspects
//! file content to decide whether it applies.

mod bash;
mod dockerfile;
mod generic;
mod gotmpl;
mod hcl;
mod scala;

use std::sync::Arc;

pub use bash::BashHandler;
pub use dockerfile::DockerfileHandler;
pub use generic::GenericHandler;
pub use gotmpl::GoTemplateHandler;
pub use hcl::HclHandler;
pub use scala::ScalaHandler;

/// Metadata produced for a single chunk by C3.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedMetadata {
    pub block_type: String,
    pub hierarchy: Vec<String>,
}

impl ExtractedMetadata {
    pub fn new(block_type: impl Into<String>, hierarchy: Vec<String>) -> Self {
        Self {
            block_type: block_type.into(),
            hierarchy,
        }
    }
}

/// Shared by [`LanguageHandler`] and
/// [`crate::domain::grammars::GrammarHandler`]: both know their
/// `language_id` and how to pull block-type/hierarchy metadata out of a
/// chunk of content.
pub trait MetadataExtractor: Send + Sync {
    fn language_id(&self) -> &'static str;
    fn extract_metadata(&self, content: &str) -> ExtractedMetadata;
}

pub trait LanguageHandler: MetadataExtractor {
    fn matches_filename(&self, filename: &str) -> bool;
}

/// The fixed set of filename-matched handlers, most specific first
/// (`Dockerfile` before the generic extension handler).
pub fn all() -> Vec<Arc<dyn LanguageHandler>> {
    vec![
        Arc::new(DockerfileHandler),
        Arc::new(HclHandler),
        Arc::new(BashHandler),
        Arc::new(ScalaHandler),
        Arc::new(GoTemplateHandler),
        Arc::new(GenericHandler),
    ]
}

/// Strip a `#`-style line comment, preserving leading indentation, the
/// way `original_source`'s `YamlGrammarBase._strip_comment` does.
pub(crate) fn strip_hash_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => line[..idx].trim_end(),
        None => line.trim_end(),
    }
}

/// Drops leading blank and comment lines, returning the remainder
/// rejoined with `\n`, the way `original_source`'s
/// `handlers.utils.strip_leading_comments` does. `is_comment` tests a
/// whole (untrimmed) line.
pub(crate) fn strip_leading_comments(content: &str, is_comment: impl Fn(&str) -> bool) -> String {
    let lines: Vec<&str> = content.trim_start().lines().collect();
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !is_comment(line) {
            return lines[i..].join("\n");
        }
    }
    String::new()
}
