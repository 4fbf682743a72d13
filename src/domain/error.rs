use thiserror::Error;

/// Top-level error type for the indexing and search pipeline.
///
/// Kept to four variants per the design note on error taxonomy: callers at
/// the API boundary only need to distinguish "your input was bad",
/// "nothing here", "the outside world is broken", and "we broke".
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("infrastructure error: {0}")]
    Infrastructure(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Infrastructure(err.to_string())
    }
}

impl From<duckdb::Error> for CoreError {
    fn from(err: duckdb::Error) -> Self {
        Self::Infrastructure(err.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Infrastructure(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
