use super::{first_block_keyword, is_yaml_path, GrammarHandler};
use crate::domain::handlers::{ExtractedMetadata, MetadataExtractor};

pub struct GithubActionsGrammar;

impl MetadataExtractor for GithubActionsGrammar {
    fn language_id(&self) -> &'static str {
        "github_actions"
    }

    fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        let job_name = content
            .lines()
            .skip_while(|l| l.trim() != "jobs:")
            .skip(1)
            .find(|l| !l.trim().is_empty())
            .and_then(|l| l.trim().trim_end_matches(':').split(':').next())
            .map(|s| s.trim().to_string());
        match job_name {
            Some(name) => ExtractedMetadata::new("job", vec![name]),
            None => first_block_keyword(content),
        }
    }
}

impl GrammarHandler for GithubActionsGrammar {
    fn matches_path(&self, path: &str) -> bool {
        is_yaml_path(path) && path.contains(".github/workflows/")
    }

    fn matches_content(&self, content: &str) -> bool {
        let has_on = content
            .lines()
            .any(|l| l.trim_start().starts_with("on:") && !l.starts_with(' '));
        let has_jobs = content
            .lines()
            .any(|l| l.trim_start().starts_with("jobs:") && !l.starts_with(' '));
        has_on && has_jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_workflow_with_on_and_jobs() {
        let content = "on:\n  push:\njobs:\n  build:\n    runs-on: ubuntu-latest\n";
        assert!(GithubActionsGrammar.matches_path(".github/workflows/ci.yml"));
        assert!(GithubActionsGrammar.matches_content(content));
    }
}
