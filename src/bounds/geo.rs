//! Geo covering collaborator.
//!
//! Region decomposition lives outside this crate. The translator hands the
//! region to a [`RegionCoverer`] and treats the returned intervals as an
//! opaque superset of the matching keys.

use std::fmt;

use super::errors::BoundsResult;
use super::index::IndexEntry;
use crate::interval::Interval;
use crate::matcher::GeoRegion;

/// Computes index intervals covering a region.
pub trait RegionCoverer: fmt::Debug + Send + Sync {
    /// Cover a region on the sphere for a 2dsphere-style index.
    fn cover_spherical(
        &self,
        region: &GeoRegion,
        index: &IndexEntry,
    ) -> BoundsResult<Vec<Interval>>;

    /// Cover a planar region for a 2d index using at most `max_cells` cells.
    fn cover_planar(
        &self,
        region: &GeoRegion,
        index: &IndexEntry,
        max_cells: usize,
    ) -> BoundsResult<Vec<Interval>>;
}

/// Coverer that gives up on pruning and scans every key.
///
/// Correct for any region because geo bounds are always re-checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct FullScanCoverer;

impl RegionCoverer for FullScanCoverer {
    fn cover_spherical(
        &self,
        _region: &GeoRegion,
        _index: &IndexEntry,
    ) -> BoundsResult<Vec<Interval>> {
        Ok(vec![Interval::all_values()])
    }

    fn cover_planar(
        &self,
        _region: &GeoRegion,
        _index: &IndexEntry,
        _max_cells: usize,
    ) -> BoundsResult<Vec<Interval>> {
        Ok(vec![Interval::all_values()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::index::{KeyOption, KeyPattern};
    use serde_json::json;

    #[test]
    fn test_full_scan_coverer() {
        let index = IndexEntry::new("loc", KeyPattern::new().field("loc", KeyOption::Geo2d));
        let region = GeoRegion(json!({"$box": [[0, 0], [1, 1]]}));
        let cover = FullScanCoverer.cover_planar(&region, &index, 16).unwrap();
        assert_eq!(cover, vec![Interval::all_values()]);
    }
}
