//! C4 (symbol extraction) and the tree-sitter plumbing C12 (context
//! expansion) reuses: one grammar table, one query-resolution order, one
//! "parse and walk the query matches" routine shared by both call sites.
//!
//! Query files are resolved project → home → built-in, exactly as
//! `original_source/src/cocosearch/search/queries.py` resolves its `.scm`
//! overrides, and the built-in queries themselves are adapted from the
//! capture-name conventions in
//! `connector/adapter/treesitter_parser.rs::get_query_patterns`.

mod cache;
mod scopes;
mod symbols;

pub use cache::FileCache;
pub use scopes::{collect_scopes, lookup_enclosing_scope, Scope};
pub use symbols::extract_symbol;

use std::fs;
use std::path::Path;

use tree_sitter::{Language as TsLanguage, Parser, Tree};

/// Extension → grammar name, the full 34-entry table from spec §6. Only
/// grammars with a corresponding `tree-sitter-*` dependency (see
/// [`ts_language`]) actually produce symbols, plus `dockerfile`'s regex
/// special case in `symbols::extract_dockerfile_symbol`; the rest
/// round-trip through the table for completeness and so `GenericHandler`'s
/// language ids agree with it.
pub fn grammar_name_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "js" | "jsx" | "mjs" | "cjs" => Some("javascript"),
        "ts" | "tsx" | "mts" | "cts" => Some("typescript"),
        "go" => Some("go"),
        "rs" => Some("rust"),
        "py" | "python" | "pyi" => Some("python"),
        "java" => Some("java"),
        "c" | "h" => Some("c"),
        "cpp" | "cxx" | "cc" | "hpp" | "hxx" | "hh" => Some("cpp"),
        "rb" => Some("ruby"),
        "php" => Some("php"),
        "tf" => Some("hcl"),
        "hcl" | "tfvars" => Some("hcl"),
        "sh" | "bash" | "zsh" => Some("bash"),
        "scala" | "sc" => Some("scala"),
        "css" | "scss" => Some("css"),
        "json" => Some("json"),
        "yaml" | "yml" => Some("yaml"),
        "toml" => Some("toml"),
        "md" | "markdown" => Some("markdown"),
        "html" | "htm" => Some("html"),
        "sql" => Some("sql"),
        "kt" | "kts" => Some("kotlin"),
        "swift" => Some("swift"),
        "lua" => Some("lua"),
        "ex" | "exs" => Some("elixir"),
        "erl" => Some("erlang"),
        "hs" => Some("haskell"),
        "cs" => Some("c_sharp"),
        "proto" => Some("proto"),
        "dockerfile" => Some("dockerfile"),
        "xml" => Some("xml"),
        "graphql" | "gql" => Some("graphql"),
        "vue" => Some("vue"),
        _ => None,
    }
}

/// Grammars wired to a real `tree-sitter-*` crate. Every other grammar name
/// in [`grammar_name_for_extension`] is a recognised-but-unsupported
/// mapping: [`extract_symbol`] and [`collect_scopes`] return empty for it,
/// same as an entirely unknown language.
pub(crate) fn ts_language(grammar: &str) -> Option<TsLanguage> {
    match grammar {
        "rust" => Some(tree_sitter_rust::LANGUAGE.into()),
        "python" => Some(tree_sitter_python::LANGUAGE.into()),
        "javascript" => Some(tree_sitter_javascript::LANGUAGE.into()),
        "typescript" => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        "go" => Some(tree_sitter_go::LANGUAGE.into()),
        "hcl" => Some(tree_sitter_hcl::LANGUAGE.into()),
        "php" => Some(tree_sitter_php::LANGUAGE_PHP.into()),
        "cpp" => Some(tree_sitter_cpp::LANGUAGE.into()),
        "c" => Some(tree_sitter_c::LANGUAGE.into()),
        "java" => Some(tree_sitter_java::LANGUAGE.into()),
        "ruby" => Some(tree_sitter_ruby::LANGUAGE.into()),
        "css" => Some(tree_sitter_css::LANGUAGE.into()),
        "scala" => Some(tree_sitter_scala::LANGUAGE.into()),
        "bash" => Some(tree_sitter_bash::LANGUAGE.into()),
        _ => None,
    }
}

/// Built-in `.scm` query source for a grammar, embedded at compile time.
fn builtin_query(grammar: &str) -> Option<&'static str> {
    match grammar {
        "rust" => Some(include_str!("../queries/rust.scm")),
        "python" => Some(include_str!("../queries/python.scm")),
        "javascript" => Some(include_str!("../queries/javascript.scm")),
        "typescript" => Some(include_str!("../queries/typescript.scm")),
        "go" => Some(include_str!("../queries/go.scm")),
        "hcl" => Some(include_str!("../queries/hcl.scm")),
        "php" => Some(include_str!("../queries/php.scm")),
        "cpp" => Some(include_str!("../queries/cpp.scm")),
        "c" => Some(include_str!("../queries/c.scm")),
        "java" => Some(include_str!("../queries/java.scm")),
        "ruby" => Some(include_str!("../queries/ruby.scm")),
        "scala" => Some(include_str!("../queries/scala.scm")),
        "bash" => Some(include_str!("../queries/bash.scm")),
        _ => None,
    }
}

/// Resolves the query source for `grammar`, checking overrides in order:
/// `{project_root}/.cocosearch/queries/{grammar}.scm`, then
/// `~/.cocosearch/queries/{grammar}.scm`, then the built-in query.
pub fn resolve_query(grammar: &str, project_root: Option<&Path>) -> Option<String> {
    if let Some(root) = project_root {
        let candidate = root.join(".cocosearch/queries").join(format!("{grammar}.scm"));
        if let Ok(text) = fs::read_to_string(&candidate) {
            return Some(text);
        }
    }
    if let Some(home) = dirs_home() {
        let candidate = home.join(".cocosearch/queries").join(format!("{grammar}.scm"));
        if let Ok(text) = fs::read_to_string(&candidate) {
            return Some(text);
        }
    }
    builtin_query(grammar).map(str::to_string)
}

/// Minimal home-directory lookup so we don't pull in the `dirs` crate for a
/// single call site; mirrors `$HOME` resolution on Unix, which is the only
/// platform the rest of the stack (DuckDB bundled build) targets.
fn dirs_home() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME").map(std::path::PathBuf::from)
}

pub(crate) fn parse(grammar: &str, content: &str) -> Option<(Tree, TsLanguage)> {
    let language = ts_language(grammar)?;
    let mut parser = Parser::new();
    parser.set_language(&language).ok()?;
    let tree = parser.parse(content, None)?;
    Some((tree, language))
}
