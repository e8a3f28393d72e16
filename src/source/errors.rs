//! Source error types
//!
//! Error codes:
//! - CSVQ_SOURCE_UNAVAILABLE: backing file missing or unopenable
//! - CSVQ_READ_FAILED: I/O failure while rewinding or reading
//! - CSVQ_INVALID_TABLE: table name would leave the base directory
//! - CSVQ_UNKNOWN_TABLE: no schema configured for the table
//! - CSVQ_CONFIG_INVALID: configuration failed validation
//!
//! None of these are retried. A failed scan leaves the session usable.

use std::fmt;
use std::io;

use crate::executor::ExecutorError;

/// Source-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorCode {
    CsvqSourceUnavailable,
    CsvqReadFailed,
    CsvqInvalidTable,
    CsvqUnknownTable,
    CsvqConfigInvalid,
}

impl SourceErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SourceErrorCode::CsvqSourceUnavailable => "CSVQ_SOURCE_UNAVAILABLE",
            SourceErrorCode::CsvqReadFailed => "CSVQ_READ_FAILED",
            SourceErrorCode::CsvqInvalidTable => "CSVQ_INVALID_TABLE",
            SourceErrorCode::CsvqUnknownTable => "CSVQ_UNKNOWN_TABLE",
            SourceErrorCode::CsvqConfigInvalid => "CSVQ_CONFIG_INVALID",
        }
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Source error type with full context
#[derive(Debug)]
pub struct SourceError {
    /// Error code
    code: SourceErrorCode,
    /// Human-readable message
    message: String,
    /// Table the error relates to, if any
    table: Option<String>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl SourceError {
    fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            table: None,
            source: None,
        }
    }

    /// Backing file could not be opened
    pub fn source_unavailable(table: &str, message: impl Into<String>, source: io::Error) -> Self {
        Self {
            table: Some(table.to_string()),
            source: Some(source),
            ..Self::new(SourceErrorCode::CsvqSourceUnavailable, message)
        }
    }

    /// I/O failure on an open cursor
    pub fn read_failed(table: &str, message: impl Into<String>, source: io::Error) -> Self {
        Self {
            table: Some(table.to_string()),
            source: Some(source),
            ..Self::new(SourceErrorCode::CsvqReadFailed, message)
        }
    }

    /// Scan failed while reading the stream
    pub fn scan_failed(table: &str, err: ExecutorError) -> Self {
        let message = err.message().to_string();
        Self {
            table: Some(table.to_string()),
            source: Some(err.into_source()),
            ..Self::new(SourceErrorCode::CsvqReadFailed, message)
        }
    }

    /// Table name rejected
    pub fn invalid_table(table: &str, reason: impl Into<String>) -> Self {
        Self {
            table: Some(table.to_string()),
            ..Self::new(SourceErrorCode::CsvqInvalidTable, reason)
        }
    }

    /// No schema known for the table
    pub fn unknown_table(table: &str) -> Self {
        Self {
            table: Some(table.to_string()),
            ..Self::new(
                SourceErrorCode::CsvqUnknownTable,
                format!("No schema configured for table '{}'", table),
            )
        }
    }

    /// Configuration rejected
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::CsvqConfigInvalid, message)
    }

    /// Returns the error code
    pub fn code(&self) -> SourceErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the table, if the error relates to one
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(ref table) = self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;
