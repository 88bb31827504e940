//! ObservationScope for automatic begin/complete logging
//!
//! - Logs `QUERY_BEGIN` on creation
//! - Logs `QUERY_COMPLETE` when completed
//! - Logs `QUERY_INCOMPLETE` on drop if never completed

use std::cell::Cell;
use std::time::Instant;

use super::events::Event;
use super::logger::Logger;

/// A scope that logs start and completion of one query evaluation.
///
/// A disabled scope logs nothing, so callers can construct one
/// unconditionally and let configuration decide.
///
/// ```ignore
/// let scope = ObservationScope::new(true, &[("rows", "10")]);
/// // ... do work ...
/// scope.complete_with_fields(&[("rows", "3")]);
/// ```
pub struct ObservationScope {
    enabled: bool,
    completed: Cell<bool>,
    started_at: Instant,
}

impl ObservationScope {
    /// Opens a scope, logging `fields` with the begin event
    pub fn new(enabled: bool, fields: &[(&str, &str)]) -> Self {
        if enabled {
            Logger::info(Event::QueryBegin.as_str(), fields);
        }

        Self {
            enabled,
            completed: Cell::new(false),
            started_at: Instant::now(),
        }
    }

    /// Microseconds since the scope was opened
    pub fn elapsed_us(&self) -> u128 {
        self.started_at.elapsed().as_micros()
    }

    /// Mark the scope as completed, logging extra fields and elapsed time
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        if !self.enabled {
            return;
        }

        let elapsed = self.elapsed_us().to_string();
        let mut fields: Vec<(&str, &str)> = extra_fields.to_vec();
        fields.push(("elapsed_us", elapsed.as_str()));

        Logger::info(Event::QueryComplete.as_str(), &fields);
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if self.enabled && !self.completed.get() {
            Logger::warn(
                Event::QueryIncomplete.as_str(),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}
