//! aerodb-index-bounds - Index bounds construction for the query planner
//!
//! Translates single-field predicates into ordered interval lists over
//! index keys, with a tightness grade telling the planner what must still
//! be filtered after the scan.

pub mod bounds;
pub mod interval;
pub mod key;
pub mod matcher;
pub mod observability;

pub use bounds::{
    align_bounds, IndexBounds, IndexBoundsBuilder, IndexEntry, IndexedField, KeyOption, KeyPattern,
    Tightness,
};
pub use interval::{Interval, OrderedIntervalList};
pub use key::Value;
pub use matcher::MatchExpression;
