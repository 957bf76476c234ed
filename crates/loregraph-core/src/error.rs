use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExploreError>;

#[derive(Debug, Error)]
pub enum ExploreError {
    /// Table construction failed; callers fall back to an enumerated listing.
    #[error("projection failed: {0}")]
    Projection(String),

    /// Reported by the query runner (syntax, connectivity, ...).
    #[error("query failed: {message}")]
    Query { message: String },

    #[error("invalid records: {0}")]
    InvalidRecords(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unknown quick action `{0}`")]
    UnknownQuickAction(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExploreError {
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}
