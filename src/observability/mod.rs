//! Observability for query evaluation
//!
//! - Structured JSON log lines
//! - Typed event names
//! - Scope-based begin/complete logging
//!
//! Observability is read-only: it never changes query results.
//!
//! ```ignore
//! use recquery::observability::{Event, Logger, ObservationScope};
//!
//! Logger::info(Event::QueryComplete.as_str(), &[("rows", "42")]);
//!
//! let scope = ObservationScope::new(true, &[("rows", "100")]);
//! // ... do work ...
//! scope.complete_with_fields(&[("rows", "42")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

/// Log an event at the severity its kind implies
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    if event.is_failure() {
        Logger::log_stderr(Severity::Warn, event.as_str(), fields);
    } else {
        Logger::log(Severity::Info, event.as_str(), fields);
    }
}

/// Log an event at TRACE severity
pub fn trace_event(event: Event, fields: &[(&str, &str)]) {
    Logger::trace(event.as_str(), fields);
}
