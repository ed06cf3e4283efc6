//! Index bounds builder
//!
//! Turns a predicate on one indexed field into the key ranges an index
//! scan must visit, and reports how faithfully those ranges represent the
//! predicate.
//!
//! # Principles
//!
//! 1. Bounds are a superset of the keys the predicate can match
//! 2. Tightness says what, if anything, must be re-checked
//! 3. Canonical interval lists only: ascending, disjoint, non-empty
//! 4. Broken invariants fail loudly; loose bounds are not errors
//!
//! # Tightness
//!
//! - EXACT: the scan alone answers the predicate
//! - INEXACT_COVERED: re-apply the predicate to the index key
//! - INEXACT_FETCH: re-apply the predicate to the fetched document

mod align;
mod config;
mod errors;
mod geo;
mod index;
mod recorder;
mod regex;
mod tightness;
mod translate;
mod wildcard;

pub use align::{
    align_bounds, all_values_bounds, all_values_for_field, append_trailing_all_values_interval,
    is_single_interval, IndexBounds, SingleInterval,
};
pub use config::BoundsBuilderConfig;
pub use errors::{BoundsError, BoundsErrorCode, BoundsResult, ConfigError, Severity};
pub use geo::{FullScanCoverer, RegionCoverer};
pub use index::{IndexEntry, IndexType, IndexedField, KeyOption, KeyPattern};
pub use recorder::{EvalTree, EvalTreeBuilder, IntervalEvalRecorder, NoopRecorder};
pub use regex::{prefix_successor, simple_regex, string_may_have_unescaped_pipe, translate_regex};
pub use tightness::Tightness;
pub use translate::{
    can_use_index_for_nin, is_supported_by_hashed_index, tightness_for_type_set,
    IndexBoundsBuilder,
};
pub use wildcard::{DefaultWildcardAdjuster, WildcardBoundsAdjuster};
