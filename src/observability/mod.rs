//! Observability for the data tree
//!
//! This module provides:
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Counter metrics
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation or apply
//! 3. No background threads
//! 4. Deterministic output

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

/// Log a lifecycle event if its severity reaches `min_severity`
///
/// Used by components that carry their own log level instead of the
/// process-wide one.
pub fn log_event_above(min_severity: Severity, event: Event, fields: &[(&str, &str)]) {
    let severity = event.severity();
    if severity >= min_severity {
        Logger::emit(severity, event.as_str(), fields);
    }
}
