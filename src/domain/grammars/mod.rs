//! C1/C3: content-gated grammar handlers. A [`GrammarHandler`] only
//! applies when both a path glob *and* a content-marker predicate match —
//! this is what lets `docker-compose.yaml`, a plain Kubernetes manifest,
//! and a Helm values file all be told apart even though they share the
//! `.yaml` extension.
//!
//! Registration order matters: grammars are tried in the order
//! [`all`] returns them, first match wins, which is how Helm template
//! detection is made to beat Kubernetes manifest detection on the same
//! YAML file (spec requirement).

mod docker_compose;
mod github_actions;
mod gitlab_ci;
mod helm_template;
mod helm_values;
mod kubernetes;

use std::sync::Arc;

pub use docker_compose::DockerComposeGrammar;
pub use github_actions::GithubActionsGrammar;
pub use gitlab_ci::GitlabCiGrammar;
pub use helm_template::HelmTemplateGrammar;
pub use helm_values::HelmValuesGrammar;
pub use kubernetes::KubernetesGrammar;

use super::handlers::{ExtractedMetadata, MetadataExtractor};

pub trait GrammarHandler: MetadataExtractor {
    fn matches_path(&self, path: &str) -> bool;
    fn matches_content(&self, content: &str) -> bool;
}

pub fn all() -> Vec<Arc<dyn GrammarHandler>> {
    vec![
        Arc::new(HelmTemplateGrammar),
        Arc::new(KubernetesGrammar),
        Arc::new(HelmValuesGrammar),
        Arc::new(DockerComposeGrammar),
        Arc::new(GithubActionsGrammar),
        Arc::new(GitlabCiGrammar),
    ]
}

pub(crate) fn is_yaml_path(path: &str) -> bool {
    let ext = path.rsplit('.').next().unwrap_or("");
    matches!(ext, "yaml" | "yml")
}

pub(crate) fn first_block_keyword(content: &str) -> ExtractedMetadata {
    let first_line = content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && *l != "---")
        .unwrap_or("");
    match first_line.split_once(':') {
        Some((key, _)) => ExtractedMetadata::new(key.trim().to_string(), Vec::new()),
        None if first_line.is_empty() => ExtractedMetadata::new("document", Vec::new()),
        None => ExtractedMetadata::new("value", Vec::new()),
    }
}
