//! Query error types
//!
//! Evaluating a query never fails. Errors only arise while turning loose
//! input (order tokens, JSON query descriptions) into typed operators.

use thiserror::Error;

/// Result type for query construction
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while building operators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Sort order token other than `asc` / `desc`
    #[error("Invalid sort order: {0} (expected \"asc\" or \"desc\")")]
    InvalidSortOrder(String),

    /// Format transform name not present in the registry
    #[error("Unknown formatter: {0}")]
    UnknownFormatter(String),

    /// Query description is not valid JSON or has the wrong shape
    #[error("Invalid query description: {0}")]
    InvalidDescription(String),
}

impl QueryError {
    /// Stable error code for logs and callers
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidSortOrder(_) => "QUERY_INVALID_SORT_ORDER",
            QueryError::UnknownFormatter(_) => "QUERY_UNKNOWN_FORMATTER",
            QueryError::InvalidDescription(_) => "QUERY_INVALID_DESCRIPTION",
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::InvalidDescription(err.to_string())
    }
}
