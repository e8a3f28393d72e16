//! Streaming scan engine
//!
//! Reads a delimited stream one row at a time, never holding
//! more than the current row and the page being collected.
//!
//! Scan flow (strict order):
//! 1. Resolve the page window (query overrides engine state)
//! 2. Resolve the projection (schema positions, schema order)
//! 3. Skip the header row
//! 4. Drop rows with fewer cells than the schema width
//! 5. Decode the row into a logical record
//! 6. Evaluate conditions
//! 7. Place the match if its virtual page is at or past the requested page
//! 8. Stop once the page holds `limit` records

use std::io::Read;

use crate::observability::{Event, Logger, Severity};
use crate::query::QueryDescription;
use crate::schema::FieldSchema;

use super::errors::ExecutorResult;
use super::filters::ConditionEvaluator;
use super::record::LogicalRecord;
use super::result::{ScanOutcome, ScanOutput, ScanStats};
use super::rows::RowReader;

/// Page used when no query has set one
pub const DEFAULT_PAGE: u64 = 1;

/// Limit used when no query has set one; large enough to mean "everything"
pub const DEFAULT_LIMIT: u64 = 99_999;

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b';';

/// Scan engine holding the current page window.
///
/// The window is sticky: a query that leaves `page` or `limit` unset reuses
/// the values of the previous scan on the same engine. Call
/// [`ScanEngine::reset_window`] to go back to the defaults.
#[derive(Debug, Clone)]
pub struct ScanEngine {
    page: u64,
    limit: u64,
    default_limit: u64,
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl ScanEngine {
    /// Creates an engine whose initial limit is `default_limit` (zero means
    /// [`DEFAULT_LIMIT`])
    pub fn new(default_limit: u64) -> Self {
        let default_limit = if default_limit == 0 {
            DEFAULT_LIMIT
        } else {
            default_limit
        };
        Self {
            page: DEFAULT_PAGE,
            limit: default_limit,
            default_limit,
        }
    }

    /// Current page number
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Current page size
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Restores the default page and limit
    pub fn reset_window(&mut self) {
        self.page = DEFAULT_PAGE;
        self.limit = self.default_limit;
    }

    /// Page and limit a scan of `query` would use: the query's values
    /// where set, the engine's current window otherwise
    pub fn window_for(&self, query: &QueryDescription) -> (u64, u64) {
        (
            query.page.filter(|p| *p > 0).unwrap_or(self.page),
            query.limit.filter(|l| *l > 0).unwrap_or(self.limit),
        )
    }

    /// Scans `stream` from its current position.
    ///
    /// The caller positions the stream at the start of the file; the first
    /// row read is treated as the header.
    pub fn scan<R: Read>(
        &mut self,
        stream: R,
        schema: &FieldSchema,
        delimiter: u8,
        query: &QueryDescription,
    ) -> ExecutorResult<ScanOutput> {
        // Step 1: window
        let (page, limit) = self.window_for(query);
        self.page = page;
        self.limit = limit;

        // Step 2: projection
        let positions = if query.selects_all() {
            None
        } else {
            Some(schema.positions_of(&query.fields))
        };

        let width = schema.width();
        let mut rows = RowReader::new(stream, delimiter);
        let mut cells: Vec<String> = Vec::with_capacity(width);
        let mut stats = ScanStats::default();
        let mut collected = Vec::new();
        let mut find_count: u64 = 0;
        let mut header_seen = false;

        while let Some(line) = rows.next_row(&mut cells)? {
            // Step 3: header
            if !header_seen {
                header_seen = true;
                continue;
            }

            // Step 4: incomplete rows
            if cells.len() < width {
                stats.malformed += 1;
                if Logger::enabled(Severity::Trace) {
                    Logger::trace(
                        Event::RowMalformed.as_str(),
                        &[
                            ("cells", &cells.len().to_string()),
                            ("expected", &width.to_string()),
                            ("line", &line.to_string()),
                        ],
                    );
                }
                continue;
            }

            // Step 5: decode
            let record = LogicalRecord::decode(line, schema, &cells);

            // Step 6: conditions
            if !ConditionEvaluator::matches(&record, &query.conditions) {
                continue;
            }

            // Step 7: virtual page of this match
            let virtual_page = find_count / limit + 1;
            find_count += 1;
            stats.matched += 1;

            if virtual_page >= page {
                let record = match &positions {
                    None => record,
                    Some(positions) => LogicalRecord::project(line, schema, &cells, positions),
                };
                collected.push(record);
            }

            // Step 8: page full
            if collected.len() as u64 >= limit {
                stats.stopped_at_limit = true;
                break;
            }
        }

        stats.lines_read = rows.lines_read();
        stats.returned = collected.len() as u64;

        let outcome = if query.count_only {
            ScanOutcome::Count(collected.len())
        } else {
            ScanOutcome::Records(collected)
        };

        Ok(ScanOutput { outcome, stats })
    }
}
