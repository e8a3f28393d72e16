//! Scan counters
//!
//! - Counters only, monotonic
//! - Reset only when the owning session is created
//! - Lock-free; Relaxed ordering is enough for counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters accumulated across every scan of a session
#[derive(Debug, Default)]
pub struct ScanMetrics {
    /// Scans that produced a result
    scans_executed: AtomicU64,
    /// Scans that failed
    scans_failed: AtomicU64,
    /// Table files opened
    cursors_opened: AtomicU64,
    /// Cursors reused and rewound
    cursors_rewound: AtomicU64,
    /// Physical records read, headers included
    lines_read: AtomicU64,
    /// Rows dropped for having too few cells
    rows_malformed: AtomicU64,
    /// Rows accepted by conditions
    rows_matched: AtomicU64,
    /// Rows handed back to callers
    rows_returned: AtomicU64,
}

impl ScanMetrics {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished scan
    pub fn record_scan(&self, lines_read: u64, malformed: u64, matched: u64, returned: u64) {
        self.scans_executed.fetch_add(1, Ordering::Relaxed);
        self.lines_read.fetch_add(lines_read, Ordering::Relaxed);
        self.rows_malformed.fetch_add(malformed, Ordering::Relaxed);
        self.rows_matched.fetch_add(matched, Ordering::Relaxed);
        self.rows_returned.fetch_add(returned, Ordering::Relaxed);
    }

    /// Increment failed scans
    pub fn increment_scans_failed(&self) {
        self.scans_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment opened cursors
    pub fn increment_cursors_opened(&self) {
        self.cursors_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment rewound cursors
    pub fn increment_cursors_rewound(&self) {
        self.cursors_rewound.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            scans_executed: self.scans_executed.load(Ordering::Relaxed),
            scans_failed: self.scans_failed.load(Ordering::Relaxed),
            cursors_opened: self.cursors_opened.load(Ordering::Relaxed),
            cursors_rewound: self.cursors_rewound.load(Ordering::Relaxed),
            lines_read: self.lines_read.load(Ordering::Relaxed),
            rows_malformed: self.rows_malformed.load(Ordering::Relaxed),
            rows_matched: self.rows_matched.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub scans_executed: u64,
    pub scans_failed: u64,
    pub cursors_opened: u64,
    pub cursors_rewound: u64,
    pub lines_read: u64,
    pub rows_malformed: u64,
    pub rows_matched: u64,
    pub rows_returned: u64,
}
