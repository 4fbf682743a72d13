use once_cell::sync::Lazy;
use regex::Regex;

use super::{ExtractedMetadata, LanguageHandler, MetadataExtractor};

/// One alternation over the seven declaration forms Scala's metadata
/// handler recognizes, ported from `original_source/.../handlers/scala.py`.
static DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:[a-z]+\s+)*(class|trait|object|def|val|var|type)\s+([A-Za-z_][A-Za-z0-9_]*)",
    )
    .expect("static pattern is valid")
});

pub struct ScalaHandler;

impl MetadataExtractor for ScalaHandler {
    fn language_id(&self) -> &'static str {
        "scala"
    }

    fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        let first_line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");

        match DECL_RE.captures(first_line) {
            Some(caps) => {
                let kind = caps[1].to_string();
                let hierarchy = format!("{kind}:{}", &caps[2]);
                ExtractedMetadata::new(kind, vec![hierarchy])
            }
            None => ExtractedMetadata::new("statement", Vec::new()),
        }
    }
}

impl LanguageHandler for ScalaHandler {
    fn matches_filename(&self, filename: &str) -> bool {
        let ext = filename.rsplit('.').next().unwrap_or("");
        matches!(ext, "scala" | "sc")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_all_seven_forms() {
        for (src, kind, name) in [
            ("class Foo {", "class", "Foo"),
            ("trait Bar {", "trait", "Bar"),
            ("object Baz {", "object", "Baz"),
            ("def qux(): Unit = {", "def", "qux"),
            ("val x = 1", "val", "x"),
            ("var y = 2", "var", "y"),
            ("type Alias = Int", "type", "Alias"),
        ] {
            let meta = ScalaHandler.extract_metadata(src);
            assert_eq!(meta.block_type, kind, "src: {src}");
            assert_eq!(meta.hierarchy, vec![format!("{kind}:{name}")], "src: {src}");
        }
    }

    #[test]
    fn modifier_prefixed_class() {
        let meta = ScalaHandler.extract_metadata("final case class Point(x: Int, y: Int)");
        assert_eq!(meta.block_type, "class");
        assert_eq!(meta.hierarchy, vec!["class:Point".to_string()]);
    }
}
