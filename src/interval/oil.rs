//! Ordered interval lists.

use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::interval::{Interval, IntervalComparison};
use crate::key::{hash_key, Value};

/// `[undefined, undefined]`
pub static UNDEFINED_POINT: Lazy<Interval> = Lazy::new(|| Interval::point(Value::Undefined));

/// `[null, null]`
pub static NULL_POINT: Lazy<Interval> = Lazy::new(|| Interval::point(Value::Null));

/// `[[], []]`
pub static EMPTY_ARRAY_POINT: Lazy<Interval> =
    Lazy::new(|| Interval::point(Value::Array(Vec::new())));

pub static HASHED_UNDEFINED_POINT: Lazy<Interval> =
    Lazy::new(|| Interval::point(hash_key(&Value::Undefined)));

pub static HASHED_NULL_POINT: Lazy<Interval> =
    Lazy::new(|| Interval::point(hash_key(&Value::Null)));

pub fn undefined_point(hashed: bool) -> Interval {
    if hashed {
        HASHED_UNDEFINED_POINT.clone()
    } else {
        UNDEFINED_POINT.clone()
    }
}

pub fn null_point(hashed: bool) -> Interval {
    if hashed {
        HASHED_NULL_POINT.clone()
    } else {
        NULL_POINT.clone()
    }
}

/// The intervals allowed for one indexed field.
///
/// Once returned from the translator the list is canonical: intervals are
/// strictly ascending, and no two overlap or touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderedIntervalList {
    pub name: String,
    pub intervals: Vec<Interval>,
}

impl OrderedIntervalList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            intervals: Vec::new(),
        }
    }

    pub fn with_intervals(name: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Self {
            name: name.into(),
            intervals,
        }
    }

    /// `[MinKey, MaxKey]` for `name`.
    pub fn all_values(name: impl Into<String>) -> Self {
        Self::with_intervals(name, vec![Interval::all_values()])
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn push(&mut self, interval: Interval) {
        self.intervals.push(interval);
    }

    /// Reverse for a descending scan: both the order of the intervals and
    /// each interval's endpoints.
    pub fn reverse(&mut self) {
        self.intervals.reverse();
        for interval in &mut self.intervals {
            interval.reverse();
        }
    }

    /// Replace an ascending, non-overlapping list with everything it does not
    /// cover, from MinKey to MaxKey.
    pub fn complement(&mut self) {
        let mut boundary = Value::MinKey;
        // Whether `boundary` itself is covered by the original list.
        let mut boundary_covered = false;
        let mut out = Vec::with_capacity(self.intervals.len() + 1);

        for interval in self.intervals.drain(..) {
            if interval.start != boundary || (!boundary_covered && !interval.start_inclusive) {
                out.push(Interval::new(
                    boundary,
                    !boundary_covered,
                    interval.start,
                    !interval.start_inclusive,
                ));
            }
            boundary = interval.end;
            boundary_covered = interval.end_inclusive;
        }

        if !matches!(boundary, Value::MaxKey) || !boundary_covered {
            out.push(Interval::new(boundary, !boundary_covered, Value::MaxKey, true));
        }

        self.intervals = out;
    }

    /// True if the list is exactly `[undefined]` then `[null]`.
    pub fn is_null_interval(&self) -> bool {
        self.intervals.len() == 2
            && self.intervals[0].equals(&UNDEFINED_POINT)
            && self.intervals[1].equals(&NULL_POINT)
    }

    /// True if the list is exactly `[undefined]`, `[null]`, `[[]]`.
    pub fn is_null_and_empty_array_interval(&self) -> bool {
        self.intervals.len() == 3
            && self.intervals[0].equals(&UNDEFINED_POINT)
            && self.intervals[1].equals(&NULL_POINT)
            && self.intervals[2].equals(&EMPTY_ARRAY_POINT)
    }

    /// True if consecutive intervals strictly precede each other without
    /// touching, and no interval runs backwards.
    pub fn is_canonical(&self) -> bool {
        let ascending = self
            .intervals
            .iter()
            .all(|i| i.start < i.end || i.is_point());
        ascending
            && self
                .intervals
                .windows(2)
                .all(|w| w[0].compare(&w[1]) == IntervalComparison::Precedes)
    }
}

impl fmt::Display for OrderedIntervalList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        for (i, interval) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", interval)?;
        }
        Ok(())
    }
}
