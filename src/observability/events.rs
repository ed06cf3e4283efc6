//! Observable events of the bounds builder.
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Translation of a predicate into bounds failed
    BoundsTranslateFailed,
    /// Aligned bounds are not valid for the key pattern
    BoundsInvalid,
    /// A wildcard index loosened the tightness of translated bounds
    BoundsWildcardAdjusted,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BoundsTranslateFailed => "BOUNDS_TRANSLATE_FAILED",
            Event::BoundsInvalid => "BOUNDS_INVALID",
            Event::BoundsWildcardAdjusted => "BOUNDS_WILDCARD_ADJUSTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::BoundsTranslateFailed => Severity::Error,
            Event::BoundsInvalid => Severity::Fatal,
            Event::BoundsWildcardAdjusted => Severity::Trace,
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BoundsInvalid)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::BoundsInvalid.as_str(), "BOUNDS_INVALID");
        assert_eq!(Event::BoundsTranslateFailed.to_string(), "BOUNDS_TRANSLATE_FAILED");
    }

    #[test]
    fn test_only_invalid_bounds_fatal() {
        assert!(Event::BoundsInvalid.is_fatal());
        assert!(!Event::BoundsTranslateFailed.is_fatal());
        assert!(!Event::BoundsWildcardAdjusted.is_fatal());
    }
}
