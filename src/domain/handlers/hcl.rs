use once_cell::sync::Lazy;
use regex::Regex;

use super::{ExtractedMetadata, LanguageHandler, MetadataExtractor};

/// `resource "type" "name" {` / `module "name" {` / `variable "name" {` /
/// bare blocks like `terraform {`.
static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^\s*(?P<kind>resource|data|module|variable|output|provider|locals|terraform)\s*(?:"(?P<type>[^"]+)")?\s*(?:"(?P<name>[^"]+)")?\s*\{"#,
    )
    .expect("static pattern is valid")
});

/// HCL handler covering `.hcl`/`.tf`/`.tfvars`. See DESIGN.md Open
/// Question 1: `language_id` is always `"hcl"`, deliberately not split
/// out into a separate Terraform grammar.
pub struct HclHandler;

impl MetadataExtractor for HclHandler {
    fn language_id(&self) -> &'static str {
        "hcl"
    }

    fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        match BLOCK_RE.captures(content) {
            Some(caps) => {
                let kind = caps["kind"].to_string();
                let mut parts = vec![kind.clone()];
                if let Some(ty) = caps.name("type") {
                    parts.push(ty.as_str().to_string());
                }
                if let Some(name) = caps.name("name") {
                    parts.push(name.as_str().to_string());
                }
                ExtractedMetadata::new(kind, vec![parts.join(".")])
            }
            None => ExtractedMetadata::new("block", Vec::new()),
        }
    }
}

impl LanguageHandler for HclHandler {
    fn matches_filename(&self, filename: &str) -> bool {
        let ext = filename.rsplit('.').next().unwrap_or("");
        matches!(ext, "hcl" | "tf" | "tfvars")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_block_reports_type_and_name() {
        let meta = HclHandler.extract_metadata(r#"resource "aws_instance" "web" {"#);
        assert_eq!(meta.block_type, "resource");
        assert_eq!(meta.hierarchy, vec!["resource.aws_instance.web".to_string()]);
    }

    #[test]
    fn resource_with_two_labels_dot_joins_hierarchy() {
        let meta = HclHandler.extract_metadata(r#"resource "aws_s3_bucket" "data" {"#);
        assert_eq!(meta.block_type, "resource");
        assert_eq!(meta.hierarchy, vec!["resource.aws_s3_bucket.data".to_string()]);
    }

    #[test]
    fn language_id_is_always_hcl() {
        assert_eq!(HclHandler.language_id(), "hcl");
        assert!(HclHandler.matches_filename("main.tf"));
        assert!(HclHandler.matches_filename("vars.tfvars"));
    }
}
