//! Compound bounds and scan-direction alignment.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::errors::{BoundsError, BoundsResult};
use super::index::{IndexedField, KeyPattern};
use crate::interval::{Interval, OrderedIntervalList};
use crate::key::Value;
use crate::observability::{log_event_with_fields, Event};

/// One interval list per key-pattern field, in key-pattern order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexBounds {
    pub fields: Vec<OrderedIntervalList>,
}

fn sign(ordering: Ordering) -> i32 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

impl IndexBounds {
    pub fn new(fields: Vec<OrderedIntervalList>) -> Self {
        Self { fields }
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// True if a scan in `scan_dir` can walk these bounds over an index with
    /// key pattern `key_pattern`: one list per field, names in order, and
    /// every interval and every pair of neighbours oriented the way the scan
    /// moves over that field.
    pub fn is_valid_for(&self, key_pattern: &KeyPattern, scan_dir: i32) -> bool {
        if self.fields.len() != key_pattern.len() {
            return false;
        }

        for (oil, field) in self.fields.iter().zip(key_pattern.fields()) {
            if oil.name != field.name {
                return false;
            }

            let expected = scan_dir * field.option.direction();

            for interval in &oil.intervals {
                let cmp = sign(interval.end.cmp(&interval.start));
                // Points are valid in either direction.
                if cmp == 0 && interval.start_inclusive && interval.end_inclusive {
                    continue;
                }
                if cmp != expected {
                    return false;
                }
            }

            for pair in oil.intervals.windows(2) {
                let (prev, next) = (&pair[0], &pair[1]);
                let cmp = sign(next.start.cmp(&prev.end));
                if cmp == expected {
                    continue;
                }
                // Neighbours may share an endpoint that only one includes.
                if cmp == 0 && !(next.start_inclusive && prev.end_inclusive) {
                    continue;
                }
                return false;
            }
        }

        true
    }
}

impl fmt::Display for IndexBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, oil) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            write!(f, " {}", oil)?;
        }
        if !self.fields.is_empty() {
            write!(f, " ")?;
        }
        write!(f, "}}")
    }
}

/// `[MinKey, MaxKey]` for one field.
pub fn all_values_for_field(field: &IndexedField) -> OrderedIntervalList {
    OrderedIntervalList::all_values(field.name.clone())
}

/// Full-index bounds for a forward scan.
pub fn all_values_bounds(key_pattern: &KeyPattern) -> BoundsResult<IndexBounds> {
    let fields = key_pattern.fields().iter().map(all_values_for_field).collect();
    let mut bounds = IndexBounds::new(fields);
    align_bounds(&mut bounds, key_pattern, 1)?;
    Ok(bounds)
}

/// Reverse every field the scan walks backwards, then check the result.
///
/// Invalid bounds after alignment mean the translator produced something it
/// never should; this is reported as a fatal invariant violation.
pub fn align_bounds(
    bounds: &mut IndexBounds,
    key_pattern: &KeyPattern,
    scan_dir: i32,
) -> BoundsResult<()> {
    if scan_dir != 1 && scan_dir != -1 {
        return Err(BoundsError::precondition_violation(format!(
            "scan direction must be 1 or -1, got {}",
            scan_dir
        )));
    }
    if bounds.fields.len() != key_pattern.len() {
        return Err(BoundsError::precondition_violation(format!(
            "{} interval lists for key pattern {}",
            bounds.fields.len(),
            key_pattern
        )));
    }

    for (oil, field) in bounds.fields.iter_mut().zip(key_pattern.fields()) {
        if field.option.direction() * scan_dir == -1 {
            oil.reverse();
        }
    }

    if !bounds.is_valid_for(key_pattern, scan_dir) {
        let rendered = bounds.to_string();
        let pattern = key_pattern.to_string();
        let direction = scan_dir.to_string();
        log_event_with_fields(
            Event::BoundsInvalid,
            &[
                ("bounds", rendered.as_str()),
                ("key_pattern", pattern.as_str()),
                ("scan_direction", direction.as_str()),
            ],
        );
        return Err(BoundsError::invariant_violation("invalid bounds").with_context(rendered));
    }
    Ok(())
}

/// Bounds that reduce to one contiguous key range.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleInterval {
    pub start_key: Vec<Value>,
    pub start_inclusive: bool,
    pub end_key: Vec<Value>,
    pub end_inclusive: bool,
}

/// Extend compound start and end keys past a trailing all-values field.
///
/// Only min-to-max and max-to-min intervals contribute; an exclusive bound
/// skips past every key sharing its prefix, an inclusive one takes them all.
pub fn append_trailing_all_values_interval(
    interval: &Interval,
    start_inclusive: bool,
    end_inclusive: bool,
    start_key: &mut Vec<Value>,
    end_key: &mut Vec<Value>,
) {
    let (low, high) = if interval.is_min_to_max() {
        (Value::MinKey, Value::MaxKey)
    } else if interval.is_max_to_min() {
        (Value::MaxKey, Value::MinKey)
    } else {
        return;
    };

    // {a: {$gt: 2}} on {a: 1, b: 1} starts after {2, MaxKey}.
    start_key.push(if start_inclusive { low.clone() } else { high.clone() });
    // {a: {$lt: 2}} stops before {2, MinKey}.
    end_key.push(if end_inclusive { high } else { low });
}

/// Recognize bounds of the form: points, then at most one range, then
/// all-values fields. Returns the equivalent start and end keys.
pub fn is_single_interval(bounds: &IndexBounds) -> Option<SingleInterval> {
    let mut start_key = Vec::with_capacity(bounds.fields.len());
    let mut end_key = Vec::with_capacity(bounds.fields.len());

    let mut fields = bounds.fields.iter().peekable();

    while let Some(oil) = fields.peek() {
        match oil.intervals.as_slice() {
            [only] if only.is_point() => {
                start_key.push(only.start.clone());
                end_key.push(only.end.clone());
                fields.next();
            }
            _ => break,
        }
    }

    let Some(range_field) = fields.next() else {
        return Some(SingleInterval {
            start_key,
            start_inclusive: true,
            end_key,
            end_inclusive: true,
        });
    };

    let [range] = range_field.intervals.as_slice() else {
        return None;
    };
    start_key.push(range.start.clone());
    end_key.push(range.end.clone());
    let start_inclusive = range.start_inclusive;
    let end_inclusive = range.end_inclusive;

    for oil in fields {
        match oil.intervals.as_slice() {
            [only] if only.is_min_to_max() || only.is_max_to_min() => {
                append_trailing_all_values_interval(
                    only,
                    start_inclusive,
                    end_inclusive,
                    &mut start_key,
                    &mut end_key,
                );
            }
            _ => return None,
        }
    }

    Some(SingleInterval {
        start_key,
        start_inclusive,
        end_key,
        end_inclusive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::BoundInclusion;

    fn oil(name: &str, intervals: Vec<Interval>) -> OrderedIntervalList {
        OrderedIntervalList::with_intervals(name, intervals)
    }

    fn closed(a: i32, b: i32) -> Interval {
        Interval::range(Value::Int32(a), Value::Int32(b), BoundInclusion::IncludeBoth)
    }

    #[test]
    fn test_all_values_bounds() {
        let kp = KeyPattern::new().ascending("a").descending("b");
        let bounds = all_values_bounds(&kp).unwrap();
        assert_eq!(bounds.fields[0].intervals, vec![Interval::all_values()]);
        assert!(bounds.fields[1].intervals[0].is_max_to_min());
        assert_eq!(bounds.to_string(), "{ a: [MinKey, MaxKey]; b: [MaxKey, MinKey] }");
    }

    #[test]
    fn test_align_reverses_descending_fields() {
        let kp = KeyPattern::new().ascending("a").descending("b");
        let mut bounds = IndexBounds::new(vec![
            oil("a", vec![closed(1, 2), closed(5, 6)]),
            oil("b", vec![closed(1, 2), closed(5, 6)]),
        ]);
        align_bounds(&mut bounds, &kp, 1).unwrap();
        assert_eq!(bounds.fields[0].intervals, vec![closed(1, 2), closed(5, 6)]);
        assert_eq!(bounds.fields[1].intervals, vec![closed(6, 5), closed(2, 1)]);
    }

    #[test]
    fn test_align_backward_scan() {
        let kp = KeyPattern::new().ascending("a");
        let mut bounds = IndexBounds::new(vec![oil("a", vec![closed(1, 2)])]);
        align_bounds(&mut bounds, &kp, -1).unwrap();
        assert_eq!(bounds.fields[0].intervals, vec![closed(2, 1)]);
        assert!(bounds.is_valid_for(&kp, -1));
        assert!(!bounds.is_valid_for(&kp, 1));
    }

    #[test]
    fn test_align_rejects_overlap() {
        let kp = KeyPattern::new().ascending("a");
        let mut bounds = IndexBounds::new(vec![oil("a", vec![closed(1, 5), closed(3, 6)])]);
        let err = align_bounds(&mut bounds, &kp, 1).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.message(), "invalid bounds");
    }

    #[test]
    fn test_align_rejects_bad_direction() {
        let kp = KeyPattern::new().ascending("a");
        let mut bounds = IndexBounds::new(vec![oil("a", vec![closed(1, 2)])]);
        assert!(align_bounds(&mut bounds, &kp, 0).is_err());
    }

    #[test]
    fn test_shared_endpoint_needs_one_exclusive() {
        let kp = KeyPattern::new().ascending("a");
        let touching = IndexBounds::new(vec![oil(
            "a",
            vec![
                Interval::range(Value::Int32(1), Value::Int32(3), BoundInclusion::IncludeStartOnly),
                closed(3, 4),
            ],
        )]);
        assert!(touching.is_valid_for(&kp, 1));

        let doubled = IndexBounds::new(vec![oil("a", vec![closed(1, 3), closed(3, 4)])]);
        assert!(!doubled.is_valid_for(&kp, 1));
    }

    #[test]
    fn test_validity_checks_names_and_count() {
        let kp = KeyPattern::new().ascending("a").ascending("b");
        let short = IndexBounds::new(vec![oil("a", vec![closed(1, 2)])]);
        assert!(!short.is_valid_for(&kp, 1));
        let renamed = IndexBounds::new(vec![
            oil("a", vec![closed(1, 2)]),
            oil("c", vec![closed(1, 2)]),
        ]);
        assert!(!renamed.is_valid_for(&kp, 1));
    }

    #[test]
    fn test_single_interval_points_then_range() {
        let bounds = IndexBounds::new(vec![
            oil("a", vec![Interval::point(Value::Int32(1))]),
            oil(
                "b",
                vec![Interval::range(
                    Value::Int32(2),
                    Value::Int32(5),
                    BoundInclusion::IncludeEndOnly,
                )],
            ),
            OrderedIntervalList::all_values("c"),
        ]);
        let single = is_single_interval(&bounds).unwrap();
        assert_eq!(single.start_key, vec![Value::Int32(1), Value::Int32(2), Value::MaxKey]);
        assert!(!single.start_inclusive);
        assert_eq!(single.end_key, vec![Value::Int32(1), Value::Int32(5), Value::MaxKey]);
        assert!(single.end_inclusive);
    }

    #[test]
    fn test_single_interval_all_points() {
        let bounds = IndexBounds::new(vec![
            oil("a", vec![Interval::point(Value::Int32(1))]),
            oil("b", vec![Interval::point(Value::Int32(2))]),
        ]);
        let single = is_single_interval(&bounds).unwrap();
        assert_eq!(single.start_key, single.end_key);
        assert!(single.start_inclusive && single.end_inclusive);
    }

    #[test]
    fn test_not_single_interval() {
        let two_ranges = IndexBounds::new(vec![oil("a", vec![closed(1, 2), closed(4, 5)])]);
        assert!(is_single_interval(&two_ranges).is_none());

        let range_then_range = IndexBounds::new(vec![
            oil("a", vec![closed(1, 2)]),
            oil("b", vec![closed(1, 2)]),
        ]);
        assert!(is_single_interval(&range_then_range).is_none());
    }

    #[test]
    fn test_trailing_all_values_descending() {
        let mut start = vec![Value::Int32(2)];
        let mut end = vec![Value::Int32(9)];
        append_trailing_all_values_interval(
            &Interval::all_values().reversed(),
            false,
            true,
            &mut start,
            &mut end,
        );
        assert_eq!(start, vec![Value::Int32(2), Value::MinKey]);
        assert_eq!(end, vec![Value::Int32(9), Value::MinKey]);
    }
}
