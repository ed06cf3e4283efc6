//! Set operations over ordered interval lists.

use super::interval::{interval_ordering, Direction, Interval, IntervalComparison};
use super::oil::OrderedIntervalList;
use crate::bounds::{BoundsError, BoundsResult};

/// Check that the interval at `idx` is ascending and does not start before
/// its predecessor ends.
fn check_ascending_locally(oil: &OrderedIntervalList, idx: usize) -> BoundsResult<()> {
    let current = &oil.intervals[idx];
    if current.direction() == Direction::Descending {
        return Err(
            BoundsError::invariant_violation("interval list is not ascending")
                .with_context(oil.to_string()),
        );
    }
    if idx > 0 && oil.intervals[idx - 1].end > current.start {
        return Err(
            BoundsError::invariant_violation("interval list is out of order")
                .with_context(oil.to_string()),
        );
    }
    Ok(())
}

/// Intersect `a` into `b`; on return `b` holds the values present in both.
///
/// Both lists must belong to the same field and be ascending.
pub fn intersectize(a: &OrderedIntervalList, b: &mut OrderedIntervalList) -> BoundsResult<()> {
    if a.name != b.name {
        return Err(BoundsError::invariant_violation(format!(
            "cannot intersect bounds of '{}' with bounds of '{}'",
            a.name, b.name
        )));
    }

    let mut a_idx = 0;
    let mut b_idx = 0;
    let mut result = Vec::new();

    while a_idx < a.intervals.len() && b_idx < b.intervals.len() {
        check_ascending_locally(a, a_idx)?;
        check_ascending_locally(b, b_idx)?;

        let lhs = &a.intervals[a_idx];
        let rhs = &b.intervals[b_idx];
        let cmp = lhs.compare(rhs);

        match cmp {
            IntervalComparison::Precedes | IntervalComparison::PrecedesCouldUnion => a_idx += 1,
            IntervalComparison::Succeeds => b_idx += 1,
            _ => {
                if let Some(overlap) = lhs.intersect(rhs, cmp) {
                    result.push(overlap);
                }
                match cmp {
                    IntervalComparison::Equals => {
                        a_idx += 1;
                        b_idx += 1;
                    }
                    IntervalComparison::Within | IntervalComparison::OverlapsBefore => a_idx += 1,
                    _ => b_idx += 1,
                }
            }
        }
    }

    b.intervals = result;
    Ok(())
}

/// Sort the list and merge every overlapping or touching pair, leaving it
/// in canonical form.
pub fn unionize(oil: &mut OrderedIntervalList) -> BoundsResult<()> {
    let iv = &mut oil.intervals;
    if iv.is_empty() {
        return Ok(());
    }

    iv.sort_by(interval_ordering);

    let mut i = 0;
    while i + 1 < iv.len() {
        match iv[i].compare(&iv[i + 1]) {
            IntervalComparison::Precedes => i += 1,
            IntervalComparison::Equals | IntervalComparison::Within => {
                iv.remove(i);
            }
            IntervalComparison::Contains => {
                iv.remove(i + 1);
            }
            IntervalComparison::OverlapsBefore | IntervalComparison::PrecedesCouldUnion => {
                let next = iv.remove(i + 1);
                let merged = &mut iv[i];
                merged.end = next.end;
                merged.end_inclusive = next.end_inclusive;
            }
            IntervalComparison::Succeeds | IntervalComparison::OverlapsAfter => {
                return Err(BoundsError::invariant_violation(
                    "intervals out of order after sorting",
                )
                .with_context(format!("{} then {}", iv[i], iv[i + 1])));
            }
        }
    }
    Ok(())
}

/// Convenience: union of an arbitrary set of intervals for `name`.
pub fn union_of(name: &str, intervals: Vec<Interval>) -> BoundsResult<OrderedIntervalList> {
    let mut oil = OrderedIntervalList::with_intervals(name, intervals);
    unionize(&mut oil)?;
    Ok(oil)
}
