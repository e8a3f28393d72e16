//! Observable events
//!
//! Events are explicit and typed. One log line carries exactly one event.

use std::fmt;

/// Observable events in a query session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Source configuration loaded and validated
    ConfigLoaded,
    /// Configuration asks for write access, which is never used
    ConfigWritable,

    // Session lifecycle
    /// Session created
    SessionOpen,
    /// Session dropped, all cursors closed
    SessionClose,

    // Cursors
    /// A table file was opened for the first time in this session
    CursorOpen,
    /// An existing cursor was rewound to the start of its file
    CursorRewind,
    /// A single cursor was closed on request
    CursorClose,

    // Scans
    /// Scan started
    ScanStart,
    /// Scan finished
    ScanComplete,
    /// Scan failed (source unavailable or read error)
    ScanFailed,
    /// A row with too few cells was dropped
    RowMalformed,

    // Requests
    /// A request was answered with an error
    RequestRejected,
    /// Serving loop ready for requests
    Serving,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigWritable => "CONFIG_WRITABLE_IGNORED",

            Event::SessionOpen => "SESSION_OPEN",
            Event::SessionClose => "SESSION_CLOSE",

            Event::CursorOpen => "CURSOR_OPEN",
            Event::CursorRewind => "CURSOR_REWIND",
            Event::CursorClose => "CURSOR_CLOSE",

            Event::ScanStart => "SCAN_START",
            Event::ScanComplete => "SCAN_COMPLETE",
            Event::ScanFailed => "SCAN_FAILED",
            Event::RowMalformed => "ROW_MALFORMED",

            Event::RequestRejected => "REQUEST_REJECTED",
            Event::Serving => "CSVQUERY_SERVING",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::ScanFailed | Event::RequestRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
