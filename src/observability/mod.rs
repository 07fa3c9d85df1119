//! Observability for the record store
//!
//! Structured log events emitted through `tracing`. The library never
//! installs a subscriber; applications choose where events go.
//!
//! # Levels
//!
//! - WARN: rejected operations
//! - DEBUG: per-row writes and id allocation
//! - INFO: table lifecycle
//!
//! # Usage
//!
//! ```ignore
//! use recordstore::observability::{log_event, Event};
//!
//! log_event(Event::TableCleared, "users", "");
//! ```

mod events;

pub use events::Event;

/// Emit a lifecycle event for `table` with a free-form detail.
pub fn log_event(event: Event, table: &str, detail: &str) {
    if event.is_rejection() {
        tracing::warn!(event = event.as_str(), table, detail);
    } else if event.is_verbose() {
        tracing::debug!(event = event.as_str(), table, detail);
    } else {
        tracing::info!(event = event.as_str(), table, detail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_without_subscriber() {
        // Verifies no panic when nothing listens
        log_event(Event::TableOpened, "users", "fields=3");
        log_event(Event::InsertRejected, "users", "duplicate id 1");
        log_event(Event::EntityInserted, "users", "id=1");
    }
}
