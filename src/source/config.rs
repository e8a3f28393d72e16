//! Source configuration
//!
//! Loaded from a JSON file. Every option has a default, so `{}` is a valid
//! configuration with no tables.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::executor::{DEFAULT_DELIMITER, DEFAULT_LIMIT};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::FieldSchema;

use super::errors::{SourceError, SourceResult};

/// Configuration of a delimited-file source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Base directory containing the table files
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// File suffix appended to the table name
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Advisory only; nothing ever writes to the files
    #[serde(default = "default_readonly")]
    pub readonly: bool,

    /// Reserved; only `false` is supported
    #[serde(default)]
    pub recursive: bool,

    /// Single-character field separator
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Page size used until a query sets one
    #[serde(default = "default_limit")]
    pub default_limit: u64,

    /// Table name -> ordered field names
    #[serde(default)]
    pub tables: BTreeMap<String, FieldSchema>,
}

fn default_path() -> PathBuf {
    PathBuf::from(".")
}
fn default_extension() -> String {
    "csv".to_string()
}
fn default_readonly() -> bool {
    true
}
fn default_delimiter() -> String {
    char::from(DEFAULT_DELIMITER).to_string()
}
fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            extension: default_extension(),
            readonly: default_readonly(),
            recursive: false,
            delimiter: default_delimiter(),
            default_limit: default_limit(),
            tables: BTreeMap::new(),
        }
    }
}

impl SourceConfig {
    /// Creates a default configuration rooted at `path`
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Registers a table schema
    pub fn table(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.tables.insert(name.into(), schema);
        self
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> SourceResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SourceError::config_invalid(format!(
                "Failed to read config {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_json_str(&content)?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("config", &path.display().to_string()),
                ("tables", &config.tables.len().to_string()),
            ],
        );

        Ok(config)
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json_str(content: &str) -> SourceResult<Self> {
        let config: SourceConfig = serde_json::from_str(content)
            .map_err(|e| SourceError::config_invalid(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate option values
    pub fn validate(&self) -> SourceResult<()> {
        if self.recursive {
            return Err(SourceError::config_invalid(
                "recursive = true is not supported",
            ));
        }

        self.delimiter_byte()?;

        if self.default_limit == 0 {
            return Err(SourceError::config_invalid("default_limit must be > 0"));
        }

        if self.extension.contains(['/', '\\']) {
            return Err(SourceError::config_invalid(format!(
                "Invalid extension: '{}'",
                self.extension
            )));
        }

        if !self.readonly {
            log_event_with_fields(
                Event::ConfigWritable,
                &[("path", &self.path.display().to_string())],
            );
        }

        Ok(())
    }

    /// The delimiter as a byte.
    ///
    /// Must be exactly one ASCII character other than a quote or line break.
    pub fn delimiter_byte(&self) -> SourceResult<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() && !matches!(*b, b'"' | b'\n' | b'\r') => Ok(*b),
            _ => Err(SourceError::config_invalid(format!(
                "Invalid delimiter: '{}'. Must be a single ASCII character.",
                self.delimiter
            ))),
        }
    }

    /// Configured schema for a table
    pub fn schema(&self, table: &str) -> Option<&FieldSchema> {
        self.tables.get(table)
    }
}
