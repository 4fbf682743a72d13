use super::{first_block_keyword, is_yaml_path, GrammarHandler};
use crate::domain::handlers::{ExtractedMetadata, MetadataExtractor};

pub struct DockerComposeGrammar;

impl MetadataExtractor for DockerComposeGrammar {
    fn language_id(&self) -> &'static str {
        "docker_compose"
    }

    fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        first_block_keyword(content)
    }
}

impl GrammarHandler for DockerComposeGrammar {
    fn matches_path(&self, path: &str) -> bool {
        if !is_yaml_path(path) {
            return false;
        }
        let base = path.rsplit('/').next().unwrap_or(path);
        base.starts_with("docker-compose") || base.starts_with("compose.")
    }

    fn matches_content(&self, content: &str) -> bool {
        content
            .lines()
            .any(|l| l.trim_start() == "services:" && !l.starts_with(' '))
    }
}
