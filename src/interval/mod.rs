//! Intervals and interval algebra
//!
//! An index scan is described per field by an ordered list of intervals
//! over key values. This module provides the interval value type, the
//! ordered list, and the set operations bounds are built from:
//! - compare: relative position of two intervals
//! - intersectize: values in both lists
//! - unionize: sort and merge into canonical form
//! - complement: values in neither
//!
//! All operations are pure; lists are owned by the caller.

mod algebra;
#[allow(clippy::module_inception)]
mod interval;
mod oil;

pub use algebra::{intersectize, union_of, unionize};
pub use interval::{interval_ordering, BoundInclusion, Direction, Interval, IntervalComparison};
pub use oil::{
    null_point, undefined_point, OrderedIntervalList, EMPTY_ARRAY_POINT, HASHED_NULL_POINT,
    HASHED_UNDEFINED_POINT, NULL_POINT, UNDEFINED_POINT,
};
