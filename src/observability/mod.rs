//! Observability for fieldmap
//!
//! - Structured JSON logging to stderr
//! - Typed lifecycle events
//! - Begin/complete scopes with elapsed time
//!
//! Observability is read-only: it never changes the outcome of an operation
//! and never fails the caller.
//!
//! ```ignore
//! use fieldmap::observability::{log_event_with_fields, Event, Logger};
//!
//! Logger::info("MAPPING_BUILT", &[("fields", "42")]);
//! log_event_with_fields(Event::FieldMapRegistered, &[("field_map_id", "hosts")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_failure() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
