//! Bounds builder error types
//!
//! Error codes:
//! - AERO_BOUNDS_INVARIANT_VIOLATION (FATAL)
//! - AERO_BOUNDS_PRECONDITION_VIOLATION (FATAL)
//! - AERO_BOUNDS_UNSUPPORTED_PREDICATE (FATAL)
//!
//! Every bounds error indicates a bug in the caller or in this crate, never
//! bad user input. Predicates that merely cannot be represented exactly are
//! not errors; their looseness is reported through `Tightness`.

use std::fmt;

/// Severity levels for bounds errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Planning must stop; the produced bounds cannot be trusted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Bounds-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsErrorCode {
    /// An algebraic invariant of the interval lists was broken
    AeroBoundsInvariantViolation,
    /// The caller handed over a predicate/index combination it must not
    AeroBoundsPreconditionViolation,
    /// A predicate shape that should have been rejected upstream
    AeroBoundsUnsupportedPredicate,
}

impl BoundsErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            BoundsErrorCode::AeroBoundsInvariantViolation => "AERO_BOUNDS_INVARIANT_VIOLATION",
            BoundsErrorCode::AeroBoundsPreconditionViolation => {
                "AERO_BOUNDS_PRECONDITION_VIOLATION"
            }
            BoundsErrorCode::AeroBoundsUnsupportedPredicate => "AERO_BOUNDS_UNSUPPORTED_PREDICATE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }

    /// Returns the guarantee this error protects
    pub fn invariant(&self) -> &'static str {
        match self {
            BoundsErrorCode::AeroBoundsInvariantViolation => "canonical interval order",
            BoundsErrorCode::AeroBoundsPreconditionViolation => "index contract",
            BoundsErrorCode::AeroBoundsUnsupportedPredicate => "validated predicate shape",
        }
    }
}

impl fmt::Display for BoundsErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Bounds error with diagnostic context
#[derive(Debug, Clone)]
pub struct BoundsError {
    code: BoundsErrorCode,
    message: String,
    /// Rendering of the offending expression or bounds, for logs
    context: Option<String>,
}

impl BoundsError {
    /// Create an invariant violation error
    pub fn invariant_violation(reason: impl Into<String>) -> Self {
        Self {
            code: BoundsErrorCode::AeroBoundsInvariantViolation,
            message: reason.into(),
            context: None,
        }
    }

    /// Create a precondition violation error
    pub fn precondition_violation(reason: impl Into<String>) -> Self {
        Self {
            code: BoundsErrorCode::AeroBoundsPreconditionViolation,
            message: reason.into(),
            context: None,
        }
    }

    /// Create an unsupported predicate error
    pub fn unsupported_predicate(reason: impl Into<String>) -> Self {
        Self {
            code: BoundsErrorCode::AeroBoundsUnsupportedPredicate,
            message: reason.into(),
            context: None,
        }
    }

    /// Attach a rendering of the offending input
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> BoundsErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the guarantee violated
    pub fn invariant(&self) -> &'static str {
        self.code.invariant()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the diagnostic context if any
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// All bounds errors are fatal
    pub fn is_fatal(&self) -> bool {
        matches!(self.severity(), Severity::Fatal)
    }
}

impl fmt::Display for BoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref context) = self.context {
            write!(f, " ({})", context)?;
        }
        write!(f, " [violates {}]", self.code.invariant())?;
        Ok(())
    }
}

impl std::error::Error for BoundsError {}

/// Result type for bounds operations
pub type BoundsResult<T> = Result<T, BoundsError>;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bounds builder config: {0}")]
    Invalid(String),

    #[error("Malformed bounds builder config: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BoundsErrorCode::AeroBoundsInvariantViolation.code(),
            "AERO_BOUNDS_INVARIANT_VIOLATION"
        );
        assert_eq!(
            BoundsErrorCode::AeroBoundsPreconditionViolation.code(),
            "AERO_BOUNDS_PRECONDITION_VIOLATION"
        );
        assert_eq!(
            BoundsErrorCode::AeroBoundsUnsupportedPredicate.code(),
            "AERO_BOUNDS_UNSUPPORTED_PREDICATE"
        );
    }

    #[test]
    fn test_all_errors_fatal() {
        assert!(BoundsError::invariant_violation("x").is_fatal());
        assert!(BoundsError::precondition_violation("x").is_fatal());
        assert!(BoundsError::unsupported_predicate("x").is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = BoundsError::precondition_violation("multikey path 'a'")
            .with_context("a $_internalExprLt 5");
        let display = format!("{}", err);
        assert!(display.starts_with("[FATAL] AERO_BOUNDS_PRECONDITION_VIOLATION"));
        assert!(display.contains("multikey path 'a'"));
        assert!(display.contains("a $_internalExprLt 5"));
        assert!(display.contains("index contract"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid("max_covering_cells_2d must be > 0".into());
        assert!(err.to_string().contains("max_covering_cells_2d"));
    }
}
