//! Predicate nodes
//!
//! The bounds builder consumes already-parsed predicates restricted to a
//! single indexed field. Node kinds form a closed set; every consumer
//! matches on them exhaustively.

mod expression;

pub use expression::{ComparisonOp, GeoPredicate, GeoRegion, InList, MatchExpression, RegexMatch};
