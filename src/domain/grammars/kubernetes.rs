use super::{first_block_keyword, is_yaml_path, GrammarHandler};
use crate::domain::handlers::{ExtractedMetadata, MetadataExtractor};

/// Markers that indicate Helm templating rather than a plain static
/// manifest; their presence rules this grammar out even when
/// `apiVersion:`/`kind:` are present, so Helm template detection can run
/// first and claim the file instead.
const HELM_MARKERS: &[&str] = &["{{", "{{-", "Values.", "Release.", "Chart."];

pub struct KubernetesGrammar;

impl MetadataExtractor for KubernetesGrammar {
    fn language_id(&self) -> &'static str {
        "kubernetes"
    }

    fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        let kind = content
            .lines()
            .find_map(|l| l.trim().strip_prefix("kind:"))
            .map(|v| v.trim().to_string());
        match kind {
            Some(kind) => ExtractedMetadata::new("resource", vec![kind]),
            None => first_block_keyword(content),
        }
    }
}

impl GrammarHandler for KubernetesGrammar {
    fn matches_path(&self, path: &str) -> bool {
        is_yaml_path(path)
    }

    fn matches_content(&self, content: &str) -> bool {
        let has_api_version = content.contains("apiVersion:");
        let has_kind = content.lines().any(|l| l.trim().starts_with("kind:"));
        let has_helm_marker = HELM_MARKERS.iter().any(|m| content.contains(m));
        has_api_version && has_kind && !has_helm_marker
    }
}
