//! Observability subsystem
//!
//! - Structured logging (JSON lines on stderr)
//! - Per-session scan counters
//! - Typed lifecycle events
//!
//! Observability is read-only: nothing here changes scan results.
//!
//! # Usage
//!
//! ```ignore
//! use csvquery::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::CursorOpen, &[("table", "users")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, ScanMetrics};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_failure() {
        Severity::Error
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Event::SessionOpen);
        log_event(Event::SessionClose);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ConfigLoaded, &[("path", "/tmp/test")]);
    }
}
