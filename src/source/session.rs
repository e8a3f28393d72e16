//! Query session over a directory of delimited files
//!
//! A session owns one open file per table. The first scan of a table opens
//! its file; every later scan rewinds the same handle to offset 0 instead of
//! reopening it. All handles close when the session is closed or dropped.
//!
//! Scans take `&mut self`, so one session serves one caller at a time.
//! Sharing a session between threads is not supported.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::executor::{ScanEngine, ScanOutput};
use crate::observability::{log_event_with_fields, Event, Logger, MetricsSnapshot, ScanMetrics};
use crate::query::QueryDescription;

use super::config::SourceConfig;
use super::errors::{SourceError, SourceResult};
use super::table::{ScanRequest, TableDefinition, TableModel};

/// A set of open cursors plus the scan engine that reads them
#[derive(Debug)]
pub struct SourceSession {
    id: Uuid,
    opened_at: DateTime<Utc>,
    config: SourceConfig,
    delimiter: u8,
    cursors: HashMap<String, File>,
    engine: ScanEngine,
    metrics: ScanMetrics,
}

impl SourceSession {
    /// Opens a session. No file is touched until the first scan.
    pub fn open(config: SourceConfig) -> SourceResult<Self> {
        config.validate()?;
        let delimiter = config.delimiter_byte()?;

        let session = Self {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            engine: ScanEngine::new(config.default_limit),
            delimiter,
            config,
            cursors: HashMap::new(),
            metrics: ScanMetrics::new(),
        };

        log_event_with_fields(
            Event::SessionOpen,
            &[
                ("opened_at", &session.opened_at.to_rfc3339()),
                ("path", &session.config.path.display().to_string()),
                ("session", &session.id.to_string()),
            ],
        );

        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// The scan engine and its current page window
    pub fn engine(&self) -> &ScanEngine {
        &self.engine
    }

    /// Restores the engine's default page and limit
    pub fn reset_window(&mut self) {
        self.engine.reset_window();
    }

    /// Counters accumulated since the session was opened
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Number of tables with an open cursor
    pub fn open_cursors(&self) -> usize {
        self.cursors.len()
    }

    /// Returns true if the table's file is currently open
    pub fn is_open(&self, table: &str) -> bool {
        self.cursors.contains_key(table)
    }

    /// Looks up a configured table
    pub fn table(&self, name: &str) -> SourceResult<TableDefinition> {
        self.config
            .schema(name)
            .map(|schema| TableDefinition::new(name, schema.clone()))
            .ok_or_else(|| SourceError::unknown_table(name))
    }

    /// Path of the file backing a table
    pub fn table_path(&self, table: &str) -> SourceResult<PathBuf> {
        validate_table_name(table)?;

        let file_name = if self.config.extension.is_empty() {
            table.to_string()
        } else {
            format!("{}.{}", table, self.config.extension)
        };
        Ok(self.config.path.join(file_name))
    }

    /// Scans the table described by `request`
    pub fn read(&mut self, request: &ScanRequest<'_>) -> SourceResult<ScanOutput> {
        let table = request.table;
        let path = self.table_path(table)?;

        let (page, limit) = self.engine.window_for(request.query);
        Logger::trace(
            Event::ScanStart.as_str(),
            &[
                ("limit", &limit.to_string()),
                ("page", &page.to_string()),
                ("session", &self.id.to_string()),
                ("table", table),
            ],
        );

        let result = match acquire_cursor(&mut self.cursors, &self.metrics, table, path) {
            Ok(file) => self
                .engine
                .scan(&mut *file, request.schema, self.delimiter, request.query)
                .map_err(|e| SourceError::scan_failed(table, e)),
            Err(e) => Err(e),
        };

        match result {
            Ok(output) => {
                let stats = &output.stats;
                self.metrics
                    .record_scan(stats.lines_read, stats.malformed, stats.matched, stats.returned);
                log_event_with_fields(
                    Event::ScanComplete,
                    &[
                        ("lines", &stats.lines_read.to_string()),
                        ("malformed", &stats.malformed.to_string()),
                        ("matched", &stats.matched.to_string()),
                        ("returned", &stats.returned.to_string()),
                        ("session", &self.id.to_string()),
                        ("table", table),
                    ],
                );
                Ok(output)
            }
            Err(e) => {
                self.metrics.increment_scans_failed();
                log_event_with_fields(
                    Event::ScanFailed,
                    &[
                        ("code", e.code().code()),
                        ("session", &self.id.to_string()),
                        ("table", table),
                    ],
                );
                Err(e)
            }
        }
    }

    /// Scans a table described by a model
    pub fn read_model<M: TableModel + ?Sized>(
        &mut self,
        model: &M,
        query: &QueryDescription,
    ) -> SourceResult<ScanOutput> {
        self.read(&ScanRequest::new(model, query))
    }

    /// Scans a table whose schema comes from the configuration
    pub fn read_table(&mut self, table: &str, query: &QueryDescription) -> SourceResult<ScanOutput> {
        let definition = self.table(table)?;
        self.read_model(&definition, query)
    }

    /// Closes one table's cursor; the next scan reopens the file
    pub fn close_table(&mut self, table: &str) -> bool {
        let closed = self.cursors.remove(table).is_some();
        if closed {
            log_event_with_fields(
                Event::CursorClose,
                &[("session", &self.id.to_string()), ("table", table)],
            );
        }
        closed
    }

    /// Closes every cursor and ends the session
    pub fn close(self) {}
}

impl Drop for SourceSession {
    fn drop(&mut self) {
        let cursors = self.cursors.len();
        self.cursors.clear();
        log_event_with_fields(
            Event::SessionClose,
            &[
                ("cursors", &cursors.to_string()),
                ("session", &self.id.to_string()),
            ],
        );
    }
}

/// Returns the table's open file positioned at offset 0, opening it on
/// first use.
fn acquire_cursor<'c>(
    cursors: &'c mut HashMap<String, File>,
    metrics: &ScanMetrics,
    table: &str,
    path: PathBuf,
) -> SourceResult<&'c mut File> {
    match cursors.entry(table.to_string()) {
        Entry::Occupied(entry) => {
            let file = entry.into_mut();
            file.seek(SeekFrom::Start(0)).map_err(|e| {
                SourceError::read_failed(
                    table,
                    format!("Failed to rewind {}", path.display()),
                    e,
                )
            })?;
            metrics.increment_cursors_rewound();
            Logger::trace(Event::CursorRewind.as_str(), &[("table", table)]);
            Ok(file)
        }
        Entry::Vacant(entry) => {
            let file = File::open(&path).map_err(|e| {
                SourceError::source_unavailable(
                    table,
                    format!("Cannot open {}", path.display()),
                    e,
                )
            })?;
            metrics.increment_cursors_opened();
            log_event_with_fields(
                Event::CursorOpen,
                &[
                    ("path", &path.display().to_string()),
                    ("table", table),
                ],
            );
            Ok(entry.insert(file))
        }
    }
}

/// Table names map to a single file directly under the base directory
fn validate_table_name(table: &str) -> SourceResult<()> {
    if table.is_empty() {
        return Err(SourceError::invalid_table(table, "Table name is empty"));
    }
    if table.contains(['/', '\\', '\0']) || table == "." || table == ".." {
        return Err(SourceError::invalid_table(
            table,
            format!("Table name '{}' must not contain path components", table),
        ));
    }
    Ok(())
}
