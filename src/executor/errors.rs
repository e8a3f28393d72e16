//! Executor error types
//!
//! Error codes:
//! - CSVQ_READ_FAILED: the stream failed mid-scan
//!
//! Rows with too few cells are not errors: the scan drops them and counts
//! them in its stats. A failed scan leaves the engine usable.

use std::fmt;
use std::io;

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// The stream failed while reading a row
    CsvqReadFailed,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::CsvqReadFailed => "CSVQ_READ_FAILED",
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with full context
#[derive(Debug)]
pub struct ExecutorError {
    /// Error code
    code: ExecutorErrorCode,
    /// Human-readable message, including the physical line when known
    message: String,
    /// Underlying IO error
    source: io::Error,
}

impl ExecutorError {
    /// Reading the stream failed at `line` (the line being read, header = 0)
    pub fn read_failed(line: u64, source: io::Error) -> Self {
        Self {
            code: ExecutorErrorCode::CsvqReadFailed,
            message: format!("Read failed at line {}: {}", line, source),
            source,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consumes the error and returns the underlying IO error
    pub fn into_source(self) -> io::Error {
        self.source
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ExecutorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
