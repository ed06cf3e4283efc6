//! A single range over index key values.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::key::Value;

/// Which ends of a range are part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundInclusion {
    ExcludeBoth,
    IncludeStartOnly,
    IncludeEndOnly,
    IncludeBoth,
}

impl BoundInclusion {
    pub fn from_bools(start_inclusive: bool, end_inclusive: bool) -> Self {
        match (start_inclusive, end_inclusive) {
            (true, true) => BoundInclusion::IncludeBoth,
            (true, false) => BoundInclusion::IncludeStartOnly,
            (false, true) => BoundInclusion::IncludeEndOnly,
            (false, false) => BoundInclusion::ExcludeBoth,
        }
    }

    pub fn includes_start(self) -> bool {
        matches!(
            self,
            BoundInclusion::IncludeBoth | BoundInclusion::IncludeStartOnly
        )
    }

    pub fn includes_end(self) -> bool {
        matches!(
            self,
            BoundInclusion::IncludeBoth | BoundInclusion::IncludeEndOnly
        )
    }
}

/// Direction of an interval, derived from its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
    /// Point or empty interval.
    None,
}

/// Relative position of two ascending intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalComparison {
    /// Both intervals cover exactly the same values.
    Equals,
    /// Every value of `self` is in `other`.
    Within,
    /// Every value of `other` is in `self`.
    Contains,
    /// They overlap and `self` starts first.
    OverlapsBefore,
    /// They overlap and `other` starts first.
    OverlapsAfter,
    /// `self` lies entirely before `other`.
    Precedes,
    /// `self` lies before `other` and they touch, so the union is one interval.
    PrecedesCouldUnion,
    /// `self` lies entirely after `other`.
    Succeeds,
}

/// A range of index key values.
///
/// Intervals built by the translator are ascending (`start <= end`); bounds
/// alignment may reverse them for a descending scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub start: Value,
    pub start_inclusive: bool,
    pub end: Value,
    pub end_inclusive: bool,
}

impl Interval {
    pub fn new(start: Value, start_inclusive: bool, end: Value, end_inclusive: bool) -> Self {
        Self {
            start,
            start_inclusive,
            end,
            end_inclusive,
        }
    }

    pub fn range(start: Value, end: Value, inclusion: BoundInclusion) -> Self {
        Self::new(start, inclusion.includes_start(), end, inclusion.includes_end())
    }

    pub fn point(value: Value) -> Self {
        Self::new(value.clone(), true, value, true)
    }

    /// `[MinKey, MaxKey]`
    pub fn all_values() -> Self {
        Self::all_values_respecting_inclusion(BoundInclusion::IncludeBoth)
    }

    pub fn all_values_respecting_inclusion(inclusion: BoundInclusion) -> Self {
        Self::range(Value::MinKey, Value::MaxKey, inclusion)
    }

    /// A degenerate interval containing no values.
    pub fn empty() -> Self {
        Self::new(Value::MinKey, false, Value::MinKey, false)
    }

    pub fn bound_inclusion(&self) -> BoundInclusion {
        BoundInclusion::from_bools(self.start_inclusive, self.end_inclusive)
    }

    pub fn is_point(&self) -> bool {
        self.start_inclusive && self.end_inclusive && self.start == self.end
    }

    /// True for a degenerate interval such as `(5, 5)` or `[5, 5)`.
    pub fn is_null(&self) -> bool {
        (!self.start_inclusive || !self.end_inclusive) && self.start == self.end
    }

    pub fn is_min_to_max(&self) -> bool {
        matches!(self.start, Value::MinKey) && matches!(self.end, Value::MaxKey)
    }

    pub fn is_max_to_min(&self) -> bool {
        matches!(self.start, Value::MaxKey) && matches!(self.end, Value::MinKey)
    }

    /// True if the interval includes every key, in either direction.
    pub fn is_fully_open(&self) -> bool {
        (self.is_min_to_max() || self.is_max_to_min()) && self.start_inclusive && self.end_inclusive
    }

    pub fn direction(&self) -> Direction {
        if self.is_point() || self.is_null() {
            return Direction::None;
        }
        match self.start.cmp(&self.end) {
            Ordering::Less => Direction::Ascending,
            Ordering::Greater => Direction::Descending,
            Ordering::Equal => Direction::None,
        }
    }

    /// Swap the endpoints together with their inclusivity.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
        std::mem::swap(&mut self.start_inclusive, &mut self.end_inclusive);
    }

    pub fn reversed(&self) -> Self {
        let mut out = self.clone();
        out.reverse();
        out
    }

    /// True if the two intervals share at least one value.
    pub fn intersects(&self, other: &Interval) -> bool {
        match self.start.cmp(&other.end) {
            Ordering::Greater => return false,
            Ordering::Equal if !(self.start_inclusive && other.end_inclusive) => return false,
            _ => {}
        }
        match other.start.cmp(&self.end) {
            Ordering::Greater => false,
            Ordering::Equal => other.start_inclusive && self.end_inclusive,
            Ordering::Less => true,
        }
    }

    /// True if every value of `self` is in `other`.
    pub fn within(&self, other: &Interval) -> bool {
        match self.start.cmp(&other.start) {
            Ordering::Less => return false,
            Ordering::Equal if self.start_inclusive && !other.start_inclusive => return false,
            _ => {}
        }
        match self.end.cmp(&other.end) {
            Ordering::Greater => false,
            Ordering::Equal => !(self.end_inclusive && !other.end_inclusive),
            Ordering::Less => true,
        }
    }

    /// True if `self` starts strictly before `other`.
    pub fn precedes(&self, other: &Interval) -> bool {
        match self.start.cmp(&other.start) {
            Ordering::Less => true,
            Ordering::Equal => self.start_inclusive && !other.start_inclusive,
            Ordering::Greater => false,
        }
    }

    /// Same values covered, inclusivity included.
    pub fn equals(&self, other: &Interval) -> bool {
        self.start_inclusive == other.start_inclusive
            && self.end_inclusive == other.end_inclusive
            && self.start == other.start
            && self.end == other.end
    }

    pub fn compare(&self, other: &Interval) -> IntervalComparison {
        if self.intersects(other) {
            if self.equals(other) {
                return IntervalComparison::Equals;
            }
            if self.within(other) {
                return IntervalComparison::Within;
            }
            if other.within(self) {
                return IntervalComparison::Contains;
            }
            if self.precedes(other) {
                return IntervalComparison::OverlapsBefore;
            }
            return IntervalComparison::OverlapsAfter;
        }

        if self.precedes(other) {
            if self.end == other.start && (self.end_inclusive || other.start_inclusive) {
                return IntervalComparison::PrecedesCouldUnion;
            }
            return IntervalComparison::Precedes;
        }

        IntervalComparison::Succeeds
    }

    /// Intersection of two intervals that `compare` reported as overlapping.
    /// Returns `None` for the non-overlapping outcomes.
    pub fn intersect(&self, other: &Interval, cmp: IntervalComparison) -> Option<Interval> {
        match cmp {
            IntervalComparison::Equals | IntervalComparison::Within => Some(self.clone()),
            IntervalComparison::Contains => Some(other.clone()),
            IntervalComparison::OverlapsBefore => Some(Interval::new(
                other.start.clone(),
                other.start_inclusive,
                self.end.clone(),
                self.end_inclusive,
            )),
            IntervalComparison::OverlapsAfter => Some(Interval::new(
                self.start.clone(),
                self.start_inclusive,
                other.end.clone(),
                other.end_inclusive,
            )),
            IntervalComparison::Precedes
            | IntervalComparison::PrecedesCouldUnion
            | IntervalComparison::Succeeds => None,
        }
    }
}

/// Sort order used before merging: by start, an inclusive start first on ties.
pub fn interval_ordering(a: &Interval, b: &Interval) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.start_inclusive.cmp(&a.start_inclusive))
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.start_inclusive { '[' } else { '(' },
            self.start,
            self.end,
            if self.end_inclusive { ']' } else { ')' }
        )
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
