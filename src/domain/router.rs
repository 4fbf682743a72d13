//! C1: routes a `(path, content)` pair to the handler/grammar responsible
//! for its metadata extraction and reports the `language_id` to use for
//! tree-sitter parsing and storage.
//!
//! Precedence, most specific first: content-gated grammars, then
//! filename-matched handlers. Within each tier the registration order in
//! [`crate::domain::grammars::all`] / [`crate::domain::handlers::all`]
//! decides ties (e.g. Helm template before Kubernetes).

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::domain::grammars::{self, GrammarHandler};
use crate::domain::handlers::{self, generic_language_id, ExtractedMetadata, LanguageHandler};

static GRAMMARS: Lazy<Vec<Arc<dyn GrammarHandler>>> = Lazy::new(grammars::all);
static HANDLERS: Lazy<Vec<Arc<dyn LanguageHandler>>> = Lazy::new(handlers::all);

pub enum Route {
    Grammar(Arc<dyn GrammarHandler>),
    Handler(Arc<dyn LanguageHandler>),
}

impl Route {
    pub fn language_id(&self, path: &str) -> String {
        match self {
            Route::Grammar(g) => g.language_id().to_string(),
            Route::Handler(h) => {
                // GenericHandler's language_id varies per file extension;
                // every other handler's language_id is fixed.
                if h.language_id() == "text" {
                    generic_language_id(path).to_string()
                } else {
                    h.language_id().to_string()
                }
            }
        }
    }

    pub fn extract_metadata(&self, content: &str) -> ExtractedMetadata {
        match self {
            Route::Grammar(g) => g.extract_metadata(content),
            Route::Handler(h) => h.extract_metadata(content),
        }
    }
}

pub fn route(path: &str, content: &str) -> Route {
    for grammar in GRAMMARS.iter() {
        if grammar.matches_path(path) && grammar.matches_content(content) {
            return Route::Grammar(grammar.clone());
        }
    }
    for handler in HANDLERS.iter() {
        if handler.matches_filename(path) {
            return Route::Handler(handler.clone());
        }
    }
    // handlers::all() always ends in GenericHandler, which matches
    // everything, so this is unreachable in practice.
    Route::Handler(Arc::new(handlers::GenericHandler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helm_template_beats_kubernetes_on_same_yaml_file() {
        let content = "apiVersion: v1\nkind: {{ .Values.kind }}\n";
        let route = route("charts/app/templates/service.yaml", content);
        assert_eq!(route.language_id("charts/app/templates/service.yaml"), "helm_template");
    }

    #[test]
    fn dockerfile_routes_by_filename() {
        let route = route("Dockerfile", "FROM golang:1.22\n");
        assert_eq!(route.language_id("Dockerfile"), "dockerfile");
    }

    #[test]
    fn plain_rust_file_routes_to_generic_with_rust_language_id() {
        let route = route("src/main.rs", "fn main() {}\n");
        assert_eq!(route.language_id("src/main.rs"), "rust");
    }

    #[test]
    fn router_is_deterministic() {
        let a = route("Dockerfile", "FROM x\n").language_id("Dockerfile");
        let b = route("Dockerfile", "FROM x\n").language_id("Dockerfile");
        assert_eq!(a, b);
    }
}
