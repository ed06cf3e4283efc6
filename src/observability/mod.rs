//! Observability for the bounds builder
//!
//! Structured logging of translation failures and notable adjustments.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on produced bounds
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use aerodb_index_bounds::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::BoundsInvalid, &[("key_pattern", "{ a: 1 }")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // Only verifies no panic
        log_event(Event::BoundsWildcardAdjusted);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(
            Event::BoundsTranslateFailed,
            &[("field", "a"), ("expression", "a $_internalExprLt 1")],
        );
    }
}
