use serde::{Deserialize, Serialize};

/// Outcome of parsing a single file during a C9 parse-health pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    /// Parsed with no tree-sitter error/missing nodes.
    Ok,
    /// Parsed with some error/missing nodes but a usable tree.
    Partial,
    /// Failed to produce a usable tree at all.
    Error,
    /// No grammar registered for this file's language.
    Unsupported,
}

impl ParseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Partial => "partial",
            Self::Error => "error",
            Self::Unsupported => "unsupported",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    pub file_path: String,
    pub language: String,
    pub status: ParseStatus,
    /// First 10 offending lines, `+N more` appended when truncated; `None`
    /// when status is `Ok`.
    pub error_message: Option<String>,
}

impl ParseResult {
    pub fn ok(file_path: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            language: language.into(),
            status: ParseStatus::Ok,
            error_message: None,
        }
    }

    pub fn unsupported(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            language: "unknown".to_string(),
            status: ParseStatus::Unsupported,
            error_message: None,
        }
    }
}
