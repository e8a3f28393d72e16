//! Schema construction errors

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while building a field schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Schema must declare at least one field")]
    Empty,

    #[error("Field name at position {0} is empty after trimming quotes")]
    BlankField(usize),
}

impl SchemaError {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Empty => "CSVQ_SCHEMA_EMPTY",
            SchemaError::BlankField(_) => "CSVQ_SCHEMA_BLANK_FIELD",
        }
    }
}
