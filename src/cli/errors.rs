//! CLI-specific error types
//!
//! Config and stdin/stdout errors end the process. Request errors are
//! reported on stdout and, in `serve`, the loop moves on to the next line.

use std::fmt;
use std::io;

use crate::query::QueryError;
use crate::schema::SchemaError;
use crate::source::{SourceError, SourceErrorCode};

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Request line is not a valid request
    RequestError,
    /// Error raised by the query, schema or source layer, with its own code
    Domain(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CSVQ_CLI_CONFIG_ERROR",
            Self::IoError => "CSVQ_CLI_IO_ERROR",
            Self::RequestError => "CSVQ_CLI_REQUEST_ERROR",
            Self::Domain(code) => code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Request error
    pub fn request_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RequestError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the error must end the serving loop
    pub fn is_fatal(&self) -> bool {
        matches!(self.code, CliErrorCode::ConfigError | CliErrorCode::IoError)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Self::io_error(format!("JSON I/O error: {}", e))
        } else {
            Self::request_error(format!("Invalid request JSON: {}", e))
        }
    }
}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        match e.code() {
            SourceErrorCode::CsvqConfigInvalid => Self::config_error(e.to_string()),
            code => Self::new(CliErrorCode::Domain(code.code()), e.message()),
        }
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self::new(CliErrorCode::Domain(e.code()), e.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::Domain(e.code()), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
