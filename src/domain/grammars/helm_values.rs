use super::{first_block_keyword, is_yaml_path, GrammarHandler};
use crate::domain::handlers::{ExtractedMetadata, MetadataExtractor};

/// Top-level keys conventionally present in a Helm chart's `values.yaml`.
/// Presence of at least [`MIN_MARKER_MATCHES`] of them is the content
/// heuristic, ported from
/// `original_source/.../grammars/helm_values.py`. Tunable — see
/// DESIGN.md Open Question 3.
const VALUES_KEYS: &[&str] = &[
    "replicaCount:",
    "image:",
    "imagePullSecrets:",
    "nameOverride:",
    "serviceAccount:",
    "podAnnotations:",
    "service:",
    "ingress:",
    "resources:",
    "autoscaling:",
    "nodeSelector:",
];

const MIN_MARKER_MATCHES: usize = 3;

pub struct HelmValuesGrammar;

impl MetadataExtractor for HelmValuesGrammar {
    fn language_id(&self) -> &'static str {
        "helm_values"
    }

    fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        first_block_keyword(content)
    }
}

impl GrammarHandler for HelmValuesGrammar {
    fn matches_path(&self, path: &str) -> bool {
        is_yaml_path(path)
            && matches!(path.rsplit('/').next(), Some("values.yaml") | Some("values.yml"))
    }

    fn matches_content(&self, content: &str) -> bool {
        let matches = VALUES_KEYS
            .iter()
            .filter(|k| content.lines().any(|l| l.trim_start().starts_with(*k)))
            .count();
        matches >= MIN_MARKER_MATCHES
    }
}
