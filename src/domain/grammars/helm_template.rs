use super::{first_block_keyword, is_yaml_path, GrammarHandler};
use crate::domain::handlers::{ExtractedMetadata, MetadataExtractor};

/// A YAML file under a Helm chart's `templates/` directory using Go
/// template syntax. Registered before [`super::KubernetesGrammar`] so a
/// templated manifest is claimed here first.
pub struct HelmTemplateGrammar;

impl MetadataExtractor for HelmTemplateGrammar {
    fn language_id(&self) -> &'static str {
        "helm_template"
    }

    fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        first_block_keyword(content)
    }
}

impl GrammarHandler for HelmTemplateGrammar {
    fn matches_path(&self, path: &str) -> bool {
        is_yaml_path(path) && path.contains("templates/")
    }

    fn matches_content(&self, content: &str) -> bool {
        content.contains("{{") && (content.contains("Values.") || content.contains("Release."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_templated_manifest_under_templates_dir() {
        let content = "apiVersion: v1\nkind: {{ .Values.kind }}\n";
        assert!(HelmTemplateGrammar.matches_path("charts/app/templates/service.yaml"));
        assert!(HelmTemplateGrammar.matches_content(content));
    }

    #[test]
    fn does_not_match_outside_templates_dir() {
        assert!(!HelmTemplateGrammar.matches_path("charts/app/values.yaml"));
    }
}
