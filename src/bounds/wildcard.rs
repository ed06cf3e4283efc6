//! Tightness fix-up for wildcard indexes.
//!
//! A wildcard index expands embedded objects and arrays into keys for their
//! leaves, so it never stores an object or array value itself. Bounds that
//! reach into those brackets, or that run over a path known to hold arrays,
//! cannot be trusted without fetching the document.

use std::fmt;

use super::index::IndexEntry;
use super::tightness::Tightness;
use crate::interval::{BoundInclusion, Interval, OrderedIntervalList};
use crate::key::{max_for_type, min_for_type, BsonType};

/// Hook applied after translation when the index is a wildcard index.
pub trait WildcardBoundsAdjuster: fmt::Debug + Send + Sync {
    /// Returns the adjusted tightness. May rewrite `oil`; must never return
    /// a tighter value than `tightness`.
    fn adjust(
        &self,
        index: &IndexEntry,
        tightness: Tightness,
        oil: &mut OrderedIntervalList,
    ) -> Tightness;
}

/// Loosens to INEXACT_FETCH when the bounds touch the object or array
/// brackets or the path is multikey.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultWildcardAdjuster;

impl DefaultWildcardAdjuster {
    /// `[{}, BinData-min)`: every object and array key.
    fn object_and_array_bracket() -> Interval {
        Interval::range(
            min_for_type(BsonType::Object),
            max_for_type(BsonType::Array),
            BoundInclusion::IncludeStartOnly,
        )
    }
}

impl WildcardBoundsAdjuster for DefaultWildcardAdjuster {
    fn adjust(
        &self,
        index: &IndexEntry,
        tightness: Tightness,
        oil: &mut OrderedIntervalList,
    ) -> Tightness {
        if tightness == Tightness::InexactFetch {
            return tightness;
        }

        let bracket = Self::object_and_array_bracket();
        let touches_nested = oil.intervals.iter().any(|i| i.intersects(&bracket));

        if touches_nested || index.path_has_multikey_component(&oil.name) {
            Tightness::InexactFetch
        } else {
            tightness
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::index::KeyPattern;
    use crate::key::Value;

    fn wildcard_index() -> IndexEntry {
        IndexEntry::new("w", KeyPattern::new().ascending("$**"))
    }

    #[test]
    fn test_scalar_bounds_keep_tightness() {
        let mut oil =
            OrderedIntervalList::with_intervals("a", vec![Interval::point(Value::Int32(5))]);
        let t = DefaultWildcardAdjuster.adjust(&wildcard_index(), Tightness::Exact, &mut oil);
        assert_eq!(t, Tightness::Exact);
    }

    #[test]
    fn test_full_range_needs_fetch() {
        let mut oil = OrderedIntervalList::all_values("a");
        let t = DefaultWildcardAdjuster.adjust(&wildcard_index(), Tightness::Exact, &mut oil);
        assert_eq!(t, Tightness::InexactFetch);
    }

    #[test]
    fn test_multikey_path_needs_fetch() {
        let index = wildcard_index().with_multikey_paths(["a"]);
        let mut oil =
            OrderedIntervalList::with_intervals("a.b", vec![Interval::point(Value::Int32(5))]);
        let t = DefaultWildcardAdjuster.adjust(&index, Tightness::InexactCovered, &mut oil);
        assert_eq!(t, Tightness::InexactFetch);
    }
}
