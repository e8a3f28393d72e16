//! Query parsing errors

use thiserror::Error;

/// Result type for query parsing
pub type QueryResult<T> = Result<T, QueryError>;

/// Structural problems in a query description.
///
/// Page, limit and count values are never errors: anything unusable is
/// normalized to "unset" while parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Query must be a JSON object")]
    NotAnObject,

    #[error("Conditions must be a JSON object, got {0}")]
    InvalidConditions(String),

    #[error("Group '{0}' must contain an object or a list of objects")]
    InvalidGroup(String),

    #[error("Unsupported condition value for '{0}'")]
    InvalidValue(String),

    #[error("Unknown comparison operator '{1}' in condition key '{0}'")]
    UnknownOperator(String, String),

    #[error("Field list must be an array of strings")]
    InvalidFields,
}

impl QueryError {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        "CSVQ_INVALID_QUERY"
    }
}
