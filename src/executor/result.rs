//! Result types for scans

use serde_json::{json, Value};

use super::record::LogicalRecord;

/// What a scan hands back to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Records of the requested page, in file order
    Records(Vec<LogicalRecord>),
    /// Number of records collected for the requested page.
    ///
    /// This is the size of the page, not the number of matches in the file.
    Count(usize),
}

impl ScanOutcome {
    /// Returns the records, or `None` in count mode
    pub fn records(&self) -> Option<&[LogicalRecord]> {
        match self {
            ScanOutcome::Records(records) => Some(records),
            ScanOutcome::Count(_) => None,
        }
    }

    /// Consumes the outcome and returns the records (empty in count mode)
    pub fn into_records(self) -> Vec<LogicalRecord> {
        match self {
            ScanOutcome::Records(records) => records,
            ScanOutcome::Count(_) => Vec::new(),
        }
    }

    /// Number of rows on the page in either mode
    pub fn count(&self) -> usize {
        match self {
            ScanOutcome::Records(records) => records.len(),
            ScanOutcome::Count(n) => *n,
        }
    }

    /// JSON shape returned to clients: an array of records or `{"count": n}`
    pub fn to_json(&self) -> Value {
        match self {
            ScanOutcome::Records(records) => json!(records),
            ScanOutcome::Count(n) => json!({ "count": n }),
        }
    }
}

/// Counters gathered during one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Physical records read, header included
    pub lines_read: u64,
    /// Rows dropped for having fewer cells than the schema width
    pub malformed: u64,
    /// Rows accepted by the condition tree
    pub matched: u64,
    /// Rows placed in the result
    pub returned: u64,
    /// Whether the scan stopped because the page was full
    pub stopped_at_limit: bool,
}

/// Result of a scan together with its stats
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub outcome: ScanOutcome,
    pub stats: ScanStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_outcome_json() {
        let outcome = ScanOutcome::Count(3);
        assert_eq!(outcome.to_json(), json!({"count": 3}));
        assert_eq!(outcome.count(), 3);
        assert!(outcome.records().is_none());
        assert!(outcome.into_records().is_empty());
    }

    #[test]
    fn test_records_outcome_json() {
        let mut record = LogicalRecord::new(1);
        record.insert("name", "Ann".to_string());
        let outcome = ScanOutcome::Records(vec![record]);

        assert_eq!(outcome.to_json(), json!([{"id": 1, "name": "Ann"}]));
        assert_eq!(outcome.count(), 1);
    }
}
