use super::{first_block_keyword, is_yaml_path, GrammarHandler};
use crate::domain::handlers::{ExtractedMetadata, MetadataExtractor};

pub struct GitlabCiGrammar;

impl MetadataExtractor for GitlabCiGrammar {
    fn language_id(&self) -> &'static str {
        "gitlab_ci"
    }

    fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        first_block_keyword(content)
    }
}

impl GrammarHandler for GitlabCiGrammar {
    fn matches_path(&self, path: &str) -> bool {
        is_yaml_path(path) && path.rsplit('/').next() == Some(".gitlab-ci.yml")
    }

    fn matches_content(&self, content: &str) -> bool {
        let top_level = |key: &str| {
            content
                .lines()
                .any(|l| l.trim_start() == format!("{key}:") && !l.starts_with(' '))
        };
        let has_stages = top_level("stages");
        let has_script = content.lines().any(|l| l.trim_start().starts_with("script:"));
        let has_image_or_stage = content
            .lines()
            .any(|l| l.trim_start().starts_with("image:") || l.trim_start().starts_with("stage:"));
        has_stages || (has_script && has_image_or_stage)
    }
}
