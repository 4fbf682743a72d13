use once_cell::sync::Lazy;
use regex::Regex;

use super::{strip_leading_comments, ExtractedMetadata, LanguageHandler, MetadataExtractor};

/// `FROM <image> [AS <stage>]`, case-insensitive on the keywords.
static FROM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*FROM\s+(?P<image>\S+)(?:\s+AS\s+(?P<stage>\S+))?\s*$")
        .expect("static pattern is valid")
});

static INSTRUCTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*([A-Z]+)\b").expect("static pattern is valid"));

/// Extracts `FROM`/stage metadata the way `dockerfile.py` does: only a
/// `FROM` line produces a non-empty hierarchy (`stage:<name>` if it has
/// an `AS` clause, else `image:<ref>`); every other instruction reports
/// its bare keyword as `block_type` with an empty hierarchy. See
/// DESIGN.md for why C4's symbol extractor still reports a definition
/// for `FROM … AS <stage>` while this stays hierarchy-less for
/// everything else.
pub struct DockerfileHandler;

impl MetadataExtractor for DockerfileHandler {
    fn language_id(&self) -> &'static str {
        "dockerfile"
    }

    fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        let stripped = strip_leading_comments(content, |l| l.trim_start().starts_with('#'));
        let first_line = stripped.lines().next().unwrap_or("");

        if let Some(caps) = FROM_RE.captures(first_line) {
            let hierarchy = match caps.name("stage") {
                Some(stage) => vec![format!("stage:{}", stage.as_str())],
                None => vec![format!("image:{}", &caps["image"])],
            };
            return ExtractedMetadata::new("FROM", hierarchy);
        }

        if let Some(caps) = INSTRUCTION_RE.captures(first_line) {
            let keyword = caps[1].to_uppercase();
            return ExtractedMetadata::new(keyword, Vec::new());
        }

        ExtractedMetadata::new("instruction", Vec::new())
    }
}

impl LanguageHandler for DockerfileHandler {
    fn matches_filename(&self, filename: &str) -> bool {
        let base = filename.rsplit('/').next().unwrap_or(filename);
        base == "Dockerfile" || base.starts_with("Dockerfile.")
    }
}
