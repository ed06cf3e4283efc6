//! Interval Algebra Property Tests
//!
//! Set-level properties of the interval list operations, checked by
//! membership of probe keys:
//! - unionize produces canonical lists and is idempotent
//! - intersection is symmetric and matches set intersection
//! - complement inverts membership and is an involution

use aerodb_index_bounds::bounds::prefix_successor;
use aerodb_index_bounds::interval::{
    intersectize, union_of, unionize, Interval, OrderedIntervalList,
};
use aerodb_index_bounds::key::Value;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_interval() -> impl Strategy<Value = Interval> {
    (0i32..10, 0i32..10, any::<bool>(), any::<bool>()).prop_filter_map(
        "degenerate interval",
        |(a, b, si, ei)| {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let interval = Interval::new(Value::Int32(lo), si, Value::Int32(hi), ei);
            (!interval.is_null()).then_some(interval)
        },
    )
}

fn arb_intervals() -> impl Strategy<Value = Vec<Interval>> {
    prop::collection::vec(arb_interval(), 0..6)
}

fn canonical(intervals: Vec<Interval>) -> OrderedIntervalList {
    union_of("a", intervals).unwrap()
}

fn contains(oil: &OrderedIntervalList, key: &Value) -> bool {
    let probe = Interval::point(key.clone());
    oil.intervals.iter().any(|i| i.intersects(&probe))
}

/// Integer keys, the midpoints between them, and the sentinels.
fn probes() -> Vec<Value> {
    let mut keys = vec![Value::MinKey, Value::MaxKey];
    for i in -1..=11 {
        keys.push(Value::Int32(i));
        keys.push(Value::Double(f64::from(i) + 0.5));
    }
    keys
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn test_unionize_is_canonical(intervals in arb_intervals()) {
        let oil = canonical(intervals.clone());
        prop_assert!(oil.is_canonical());

        for key in probes() {
            let expected = intervals.iter().any(|i| i.intersects(&Interval::point(key.clone())));
            prop_assert_eq!(contains(&oil, &key), expected);
        }
    }

    #[test]
    fn test_unionize_is_idempotent(intervals in arb_intervals()) {
        let once = canonical(intervals);
        let mut twice = once.clone();
        unionize(&mut twice).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_intersection_is_symmetric(a in arb_intervals(), b in arb_intervals()) {
        let a = canonical(a);
        let b = canonical(b);

        let mut ab = b.clone();
        intersectize(&a, &mut ab).unwrap();
        let mut ba = a.clone();
        intersectize(&b, &mut ba).unwrap();

        prop_assert!(ab.is_canonical());
        prop_assert_eq!(&ab, &ba);

        for key in probes() {
            prop_assert_eq!(contains(&ab, &key), contains(&a, &key) && contains(&b, &key));
        }
    }

    #[test]
    fn test_complement_inverts_membership(intervals in arb_intervals()) {
        let original = canonical(intervals);
        let mut complement = original.clone();
        complement.complement();

        prop_assert!(complement.is_canonical());
        for key in probes() {
            prop_assert_ne!(contains(&complement, &key), contains(&original, &key));
        }

        complement.complement();
        prop_assert_eq!(complement, original);
    }

    #[test]
    fn test_prefix_successor_bounds_extensions(
        prefix in "[a-z\u{e9}]{1,4}",
        suffix in "[a-z\u{10FFFF}]{0,3}"
    ) {
        let successor = prefix_successor(&prefix).unwrap();
        let extended = format!("{}{}", prefix, suffix);
        prop_assert!(Value::string(extended.clone()) >= Value::string(prefix.clone()));
        prop_assert!(Value::string(extended) < Value::string(successor));
    }
}

// =============================================================================
// Fixed Cases
// =============================================================================

/// Touching intervals with one inclusive endpoint merge.
#[test]
fn test_touching_intervals_merge() {
    let oil = canonical(vec![
        Interval::new(Value::Int32(1), true, Value::Int32(3), false),
        Interval::new(Value::Int32(3), true, Value::Int32(5), true),
    ]);
    assert_eq!(
        oil.intervals,
        vec![Interval::new(Value::Int32(1), true, Value::Int32(5), true)]
    );
}

/// Touching intervals that both exclude the endpoint stay apart.
#[test]
fn test_open_touching_intervals_stay_apart() {
    let oil = canonical(vec![
        Interval::new(Value::Int32(3), false, Value::Int32(5), true),
        Interval::new(Value::Int32(1), true, Value::Int32(3), false),
    ]);
    assert_eq!(oil.len(), 2);
    assert!(oil.is_canonical());
}

/// Intersection rejects a descending input.
#[test]
fn test_intersect_rejects_descending_input() {
    let descending = OrderedIntervalList::with_intervals(
        "a",
        vec![Interval::new(Value::Int32(5), true, Value::Int32(1), true)],
    );
    let mut other = OrderedIntervalList::all_values("a");
    assert!(intersectize(&descending, &mut other).is_err());
}
