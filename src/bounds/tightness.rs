//! How precisely a set of bounds represents its predicate.

use std::fmt;

use serde::Serialize;

/// Precision of bounds relative to the predicate, tightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tightness {
    /// The bounds match exactly the keys satisfying the predicate.
    Exact,
    /// Some keys in bounds may not match; re-checking the key suffices.
    InexactCovered,
    /// Some keys in bounds may not match; the document must be fetched.
    InexactFetch,
}

impl Tightness {
    /// Combine sub-results; the looser one wins.
    pub fn combine(self, other: Tightness) -> Tightness {
        self.max(other)
    }

    pub fn is_exact(self) -> bool {
        self == Tightness::Exact
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tightness::Exact => "EXACT",
            Tightness::InexactCovered => "INEXACT_COVERED",
            Tightness::InexactFetch => "INEXACT_FETCH",
        }
    }
}

impl fmt::Display for Tightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
