use once_cell::sync::Lazy;
use regex::Regex;

use super::{ExtractedMetadata, LanguageHandler, MetadataExtractor};

/// `{{- define "name" -}}` / `{{define "name"}}`, ported from
/// `original_source/.../handlers/gotmpl.py`.
static DEFINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\{\{-?\s*define\s+"([^"]+)"\s*-?\}\}"#).unwrap());

pub struct GoTemplateHandler;

impl MetadataExtractor for GoTemplateHandler {
    fn language_id(&self) -> &'static str {
        "gotmpl"
    }

    fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        match DEFINE_RE.captures(content) {
            Some(caps) => ExtractedMetadata::new("define", vec![format!("define:{}", &caps[1])]),
            None => ExtractedMetadata::new("template", Vec::new()),
        }
    }
}

impl LanguageHandler for GoTemplateHandler {
    fn matches_filename(&self, filename: &str) -> bool {
        let ext = filename.rsplit('.').next().unwrap_or("");
        matches!(ext, "gotmpl" | "tmpl") || filename.ends_with(".yaml.tmpl")
    }
}
