//! Predicate to bounds translation.
//!
//! `IndexBoundsBuilder::translate` maps one predicate on one indexed field
//! to an ordered interval list plus a `Tightness`. The rules per predicate
//! kind encode query semantics that an index cannot see directly:
//! - missing fields are indexed as null
//! - comparisons only match within the operand's type bracket
//! - a multikey index holds one key per array element
//! - a collated index holds comparison keys instead of strings
//!
//! Whatever cannot be represented exactly is reported through the
//! tightness; only broken invariants and caller contract violations are
//! errors.

use std::sync::Arc;

use super::config::BoundsBuilderConfig;
use super::errors::{BoundsError, BoundsResult};
use super::geo::{FullScanCoverer, RegionCoverer};
use super::index::{IndexEntry, IndexType, IndexedField, KeyOption};
use super::recorder::{IntervalEvalRecorder, NoopRecorder};
use super::regex::translate_regex;
use super::tightness::Tightness;
use super::wildcard::{DefaultWildcardAdjuster, WildcardBoundsAdjuster};
use crate::interval::{
    interval_ordering, intersectize, null_point, undefined_point, unionize, BoundInclusion,
    Interval, OrderedIntervalList, EMPTY_ARRAY_POINT,
};
use crate::key::{hash_key, index_key, max_for_type, min_for_type, BsonType, TypeSet, Value};
use crate::matcher::{ComparisonOp, GeoPredicate, GeoRegion, InList, MatchExpression};
use crate::observability::{log_event_with_fields, Event};

/// Translates predicates into index bounds.
///
/// Holds no per-call state; one builder may serve many threads.
#[derive(Debug, Clone)]
pub struct IndexBoundsBuilder {
    config: BoundsBuilderConfig,
    coverer: Arc<dyn RegionCoverer>,
    wildcard: Arc<dyn WildcardBoundsAdjuster>,
}

impl Default for IndexBoundsBuilder {
    fn default() -> Self {
        Self::new(BoundsBuilderConfig::default())
    }
}

impl IndexBoundsBuilder {
    pub fn new(config: BoundsBuilderConfig) -> Self {
        Self {
            config,
            coverer: Arc::new(FullScanCoverer),
            wildcard: Arc::new(DefaultWildcardAdjuster),
        }
    }

    pub fn with_coverer(mut self, coverer: Arc<dyn RegionCoverer>) -> Self {
        self.coverer = coverer;
        self
    }

    pub fn with_wildcard_adjuster(mut self, wildcard: Arc<dyn WildcardBoundsAdjuster>) -> Self {
        self.wildcard = wildcard;
        self
    }

    pub fn config(&self) -> &BoundsBuilderConfig {
        &self.config
    }

    /// Translate `expr` into bounds for `field` of `index`.
    pub fn translate(
        &self,
        expr: &MatchExpression,
        field: &IndexedField,
        index: &IndexEntry,
    ) -> BoundsResult<(OrderedIntervalList, Tightness)> {
        self.translate_with(expr, field, index, &mut NoopRecorder)
    }

    /// Translate while reporting every combinator to `recorder`.
    pub fn translate_with(
        &self,
        expr: &MatchExpression,
        field: &IndexedField,
        index: &IndexEntry,
        recorder: &mut dyn IntervalEvalRecorder,
    ) -> BoundsResult<(OrderedIntervalList, Tightness)> {
        let result = self
            .translate_predicate(expr, field, index, recorder)
            .map(|(mut oil, tightness)| {
                let tightness = if index.index_type == IndexType::Wildcard {
                    self.adjust_for_wildcard(index, tightness, &mut oil)
                } else {
                    tightness
                };
                (oil, tightness)
            });

        if let Err(ref err) = result {
            if self.config.log_translation_failures {
                let expression = expr.to_string();
                let error = err.to_string();
                log_event_with_fields(
                    Event::BoundsTranslateFailed,
                    &[
                        ("error", error.as_str()),
                        ("expression", expression.as_str()),
                        ("field", field.name.as_str()),
                        ("index", index.name.as_str()),
                    ],
                );
            }
        }
        result
    }

    /// Translate a sibling predicate on the same field and intersect it into
    /// `oil`. Returns the sibling's own tightness.
    pub fn translate_and_intersect(
        &self,
        expr: &MatchExpression,
        field: &IndexedField,
        index: &IndexEntry,
        oil: &mut OrderedIntervalList,
        recorder: &mut dyn IntervalEvalRecorder,
    ) -> BoundsResult<Tightness> {
        let (arg, tightness) = self.translate_with(expr, field, index, recorder)?;
        intersectize(&arg, oil)?;
        recorder.add_intersect();
        Ok(tightness)
    }

    /// Translate a sibling predicate on the same field and union it into
    /// `oil`. Returns the sibling's own tightness.
    pub fn translate_and_union(
        &self,
        expr: &MatchExpression,
        field: &IndexedField,
        index: &IndexEntry,
        oil: &mut OrderedIntervalList,
        recorder: &mut dyn IntervalEvalRecorder,
    ) -> BoundsResult<Tightness> {
        let (arg, tightness) = self.translate_with(expr, field, index, recorder)?;
        oil.intervals.extend(arg.intervals);
        unionize(oil)?;
        recorder.add_union();
        Ok(tightness)
    }

    /// True if bounds for `expr` are EXACT or INEXACT_COVERED, so the
    /// predicate can be settled from the index key without a fetch.
    pub fn can_use_covered_matching(
        &self,
        expr: &MatchExpression,
        index: &IndexEntry,
    ) -> BoundsResult<bool> {
        let field = IndexedField::new("", KeyOption::Ascending);
        let (_, tightness) = self.translate(expr, &field, index)?;
        Ok(tightness <= Tightness::InexactCovered)
    }

    fn adjust_for_wildcard(
        &self,
        index: &IndexEntry,
        tightness: Tightness,
        oil: &mut OrderedIntervalList,
    ) -> Tightness {
        let adjusted = self.wildcard.adjust(index, tightness, oil).max(tightness);
        if adjusted != tightness && self.config.log_wildcard_adjustments {
            let bounds = oil.to_string();
            log_event_with_fields(
                Event::BoundsWildcardAdjusted,
                &[
                    ("bounds", bounds.as_str()),
                    ("from", tightness.as_str()),
                    ("index", index.name.as_str()),
                    ("to", adjusted.as_str()),
                ],
            );
        }
        adjusted
    }

    fn translate_predicate(
        &self,
        expr: &MatchExpression,
        field: &IndexedField,
        index: &IndexEntry,
        recorder: &mut dyn IntervalEvalRecorder,
    ) -> BoundsResult<(OrderedIntervalList, Tightness)> {
        let hashed = field.option.is_hashed();
        if hashed && !is_supported_by_hashed_index(expr) {
            return Err(BoundsError::precondition_violation(format!(
                "{} cannot use hashed field '{}'",
                expr.kind_name(),
                field.name
            ))
            .with_context(expr.to_string()));
        }

        let mut oil = OrderedIntervalList::new(field.name.clone());
        let collator = index.collator();

        let tightness = match expr {
            MatchExpression::ElemMatchValue { children, .. } => {
                let (first, rest) = children.split_first().ok_or_else(|| {
                    BoundsError::unsupported_predicate("$elemMatch without children")
                        .with_context(expr.to_string())
                })?;
                let (first_oil, _) = self.translate_predicate(first, field, index, recorder)?;
                oil = first_oil;
                for child in rest {
                    let (next, _) = self.translate_predicate(child, field, index, recorder)?;
                    intersectize(&next, &mut oil)?;
                    recorder.add_intersect();
                }
                // A multikey key does not say whether it came from an array.
                Tightness::InexactFetch
            }

            MatchExpression::Not(child) => {
                return self.translate_not(child, field, index, hashed, recorder);
            }

            MatchExpression::Exists { .. } => {
                oil.push(Interval::all_values());
                recorder.add_const(&oil);
                // A sparse compound index still holds documents missing
                // any one of its fields.
                if index.sparse && index.num_fields() == 1 {
                    Tightness::Exact
                } else {
                    Tightness::InexactFetch
                }
            }

            MatchExpression::Comparison { op, value, .. } => {
                let tightness = match op {
                    ComparisonOp::Eq => translate_equality(value, index, hashed, &mut oil)?,
                    ComparisonOp::Lt => translate_lt(value, index, &mut oil),
                    ComparisonOp::Lte => translate_lte(value, index, hashed, &mut oil)?,
                    ComparisonOp::Gt => translate_gt(value, index, &mut oil),
                    ComparisonOp::Gte => translate_gte(value, index, hashed, &mut oil)?,
                };
                recorder.add_eval(expr, &oil);
                tightness
            }

            MatchExpression::InternalExpr { op, value, .. } => {
                let tightness = if *op == ComparisonOp::Eq {
                    translate_equality(value, index, hashed, &mut oil)?
                } else {
                    if index.path_has_multikey_component(&field.name) {
                        return Err(BoundsError::precondition_violation(format!(
                            "expression comparison on multikey path '{}' cannot use an index",
                            field.name
                        ))
                        .with_context(expr.to_string()));
                    }
                    translate_internal_expr(*op, value, index, &mut oil)
                };
                // Expression comparisons are never parameterized.
                recorder.add_const(&oil);
                tightness
            }

            MatchExpression::Regex { regex, .. } => {
                let (intervals, tightness) = translate_regex(regex, collator.is_some());
                oil.intervals = intervals;
                recorder.add_eval(expr, &oil);
                tightness
            }

            MatchExpression::Mod { .. } => {
                oil.push(Interval::range(
                    min_for_type(BsonType::Double),
                    max_for_type(BsonType::Double),
                    BoundInclusion::IncludeBoth,
                ));
                recorder.add_const(&oil);
                Tightness::InexactCovered
            }

            MatchExpression::Type { types, .. } => {
                let tightness = translate_type(types, index, &mut oil)?;
                recorder.add_eval(expr, &oil);
                tightness
            }

            MatchExpression::In { list, .. } => {
                let tightness = translate_in(list, index, hashed, &mut oil)?;
                recorder.add_eval(expr, &oil);
                tightness
            }

            MatchExpression::Geo { geo, .. } => {
                let intervals = match field.option {
                    KeyOption::Geo2dSphere => {
                        let region = required_region(geo.spherical.as_ref(), expr, "spherical")?;
                        self.coverer.cover_spherical(region, index)?
                    }
                    KeyOption::Geo2d => {
                        let region = required_region(geo.planar.as_ref(), expr, "planar")?;
                        self.coverer
                            .cover_planar(region, index, self.config.max_covering_cells_2d)?
                    }
                    _ => return Err(self.geo_on_wrong_field(expr, field)),
                };
                oil.intervals = intervals;
                unionize(&mut oil)?;
                recorder.add_const(&oil);
                Tightness::InexactFetch
            }

            MatchExpression::BucketGeoWithin { geo, .. } => {
                if field.option != KeyOption::Geo2dSphereBucket {
                    return Err(self.geo_on_wrong_field(expr, field));
                }
                let region = required_region(bucket_region(geo), expr, "spherical")?;
                oil.intervals = self.coverer.cover_spherical(region, index)?;
                unionize(&mut oil)?;
                recorder.add_const(&oil);
                Tightness::InexactFetch
            }
        };

        Ok((oil, tightness))
    }

    fn translate_not(
        &self,
        child: &MatchExpression,
        field: &IndexedField,
        index: &IndexEntry,
        hashed: bool,
        recorder: &mut dyn IntervalEvalRecorder,
    ) -> BoundsResult<(OrderedIntervalList, Tightness)> {
        let mut oil = OrderedIntervalList::new(field.name.clone());

        match child {
            MatchExpression::Exists { .. } => {
                if index.sparse {
                    return Err(BoundsError::precondition_violation(format!(
                        "$exists: false cannot use sparse index '{}'",
                        index.name
                    )));
                }
                // Missing fields are indexed as null.
                null_equality_bounds(hashed, &mut oil)?;
                recorder.add_const(&oil);
                return Ok((oil, Tightness::InexactFetch));
            }
            MatchExpression::In { list, .. } if can_use_index_for_nin(list) => {
                null_equality_bounds(hashed, &mut oil)?;
                oil.push(EMPTY_ARRAY_POINT.clone());
                oil.complement();
                unionize(&mut oil)?;
                recorder.add_const(&oil);
                return Ok((oil, Tightness::InexactFetch));
            }
            _ => {}
        }

        let (mut oil, mut tightness) = self.translate_predicate(child, field, index, recorder)?;
        oil.complement();
        recorder.add_complement();

        // The index conflates null and missing, but `$ne: null` excludes both.
        if child.is_equality_or_in_null() {
            tightness = Tightness::Exact;
        }

        // Collated bounds are inexact only because keys differ from values,
        // so they may still be inverted.
        if tightness != Tightness::Exact && index.collator.is_none() {
            return Err(BoundsError::invariant_violation("cannot invert inexact bounds")
                .with_context(format!("$not ({}) -> {}", child, oil)));
        }

        // {a: [1, 2, 3]} matches {a: {$ne: 3}} only through its other elements.
        if index.path_has_multikey_component(&field.name) {
            tightness = Tightness::InexactFetch;
        }

        Ok((oil, tightness))
    }

    fn geo_on_wrong_field(&self, expr: &MatchExpression, field: &IndexedField) -> BoundsError {
        let element = format!("{}: {}", field.name, field.option);
        BoundsError::unsupported_predicate(format!(
            "cannot build geo bounds for index element {}",
            element
        ))
        .with_context(expr.to_string())
    }
}

fn required_region<'a>(
    region: Option<&'a GeoRegion>,
    expr: &MatchExpression,
    kind: &str,
) -> BoundsResult<&'a GeoRegion> {
    region.ok_or_else(|| {
        BoundsError::unsupported_predicate(format!("geo predicate has no {} region", kind))
            .with_context(expr.to_string())
    })
}

fn bucket_region(geo: &GeoPredicate) -> Option<&GeoRegion> {
    geo.spherical.as_ref()
}

/// Predicates a hashed field can answer: equality, `$in` without regexes
/// and existence checks.
pub fn is_supported_by_hashed_index(expr: &MatchExpression) -> bool {
    match expr {
        MatchExpression::Comparison {
            op: ComparisonOp::Eq,
            ..
        }
        | MatchExpression::InternalExpr {
            op: ComparisonOp::Eq,
            ..
        }
        | MatchExpression::Exists { .. } => true,
        MatchExpression::In { list, .. } => list.regexes().is_empty(),
        MatchExpression::Not(child) => matches!(**child, MatchExpression::Exists { .. }),
        _ => false,
    }
}

/// `$nin: [null, []]` and nothing else.
pub fn can_use_index_for_nin(list: &InList) -> bool {
    list.regexes().is_empty()
        && list.equalities().len() == 2
        && list.has_null()
        && list.has_empty_array()
}

/// Undefined and null points: the two keys an equality to null can hit.
fn null_equality_bounds(hashed: bool, oil: &mut OrderedIntervalList) -> BoundsResult<Tightness> {
    oil.push(undefined_point(hashed));
    oil.push(null_point(hashed));
    // Hashes need not preserve the undefined < null order.
    unionize(oil)?;
    Ok(Tightness::InexactFetch)
}

/// Append the bounds of an equality to `value`.
fn translate_equality(
    value: &Value,
    index: &IndexEntry,
    hashed: bool,
    oil: &mut OrderedIntervalList,
) -> BoundsResult<Tightness> {
    let collator = index.collator();

    match value {
        Value::Null => null_equality_bounds(hashed, oil),
        Value::Array(items) => {
            if hashed {
                return Err(BoundsError::precondition_violation(
                    "array equality cannot use a hashed field",
                )
                .with_context(value.to_string()));
            }
            // A multikey index stores the first element of the array, or
            // undefined for an empty array, and a nested array as itself.
            let element_key = match items.first() {
                Some(first) => index_key(first, collator),
                None => Value::Undefined,
            };
            let mut points = vec![
                Interval::point(index_key(value, collator)),
                Interval::point(element_key),
            ];
            points.sort_by(interval_ordering);
            oil.intervals.extend(points);
            Ok(Tightness::InexactFetch)
        }
        _ => {
            let mut key = index_key(value, collator);
            if hashed {
                key = hash_key(&key);
            }
            oil.push(Interval::point(key));
            if hashed || (collator.is_some() && value.is_collatable()) {
                Ok(Tightness::InexactFetch)
            } else {
                Ok(Tightness::Exact)
            }
        }
    }
}

/// Values whose bounds match exactly what the comparison matches.
fn is_exact_bounds_generating(value: &Value) -> bool {
    !matches!(
        value,
        Value::Null | Value::Undefined | Value::Array(_) | Value::Regex { .. } | Value::Symbol(_)
    )
}

/// Shared tightness rule for `$lt`, `$lte`, `$gt`, `$gte`.
fn inequality_tightness(interval: &Interval, value: &Value, index: &IndexEntry) -> Tightness {
    if interval.is_null() {
        return Tightness::Exact;
    }
    if !is_exact_bounds_generating(value) {
        return Tightness::InexactFetch;
    }
    if index.collator.is_some() && value.is_collatable() {
        return Tightness::InexactFetch;
    }
    Tightness::Exact
}

/// Endpoints of a type-bracketed `$lt`/`$lte` range.
fn lt_endpoints(value: &Value, index: &IndexEntry) -> (Value, Value) {
    let collator = index.collator();
    match value {
        Value::Array(items) => {
            // Multikey keys are the elements, so every type below the
            // array's first element may hold a match.
            let end = match items.first() {
                None => min_for_type(BsonType::Array),
                Some(first) if first.canonical_rank() > BsonType::Array.canonical_rank() => {
                    index_key(first, collator)
                }
                Some(_) => index_key(value, collator),
            };
            (Value::MinKey, end)
        }
        v if v.is_number() => (Value::Double(f64::NEG_INFINITY), index_key(v, collator)),
        v => (min_for_type(v.bson_type()), index_key(v, collator)),
    }
}

/// Endpoints of a type-bracketed `$gt`/`$gte` range.
fn gt_endpoints(value: &Value, index: &IndexEntry) -> (Value, Value) {
    let collator = index.collator();
    match value {
        Value::Array(items) => {
            let start = match items.first() {
                None => Value::MinKey,
                Some(first) if first.canonical_rank() < BsonType::Array.canonical_rank() => {
                    index_key(first, collator)
                }
                Some(_) => index_key(value, collator),
            };
            (start, Value::MaxKey)
        }
        v if v.is_number() => (index_key(v, collator), Value::Double(f64::INFINITY)),
        v => (index_key(v, collator), max_for_type(v.bson_type())),
    }
}

fn type_match(start: &Value, end: &Value) -> bool {
    start.canonical_rank() == end.canonical_rank()
}

fn translate_lt(value: &Value, index: &IndexEntry, oil: &mut OrderedIntervalList) -> Tightness {
    // Everything but MaxKey is < MaxKey; the end stays open unless the
    // array [MaxKey] may be indexed as MaxKey.
    if matches!(value, Value::MaxKey) {
        oil.push(Interval::all_values_respecting_inclusion(
            BoundInclusion::from_bools(true, index.multikey),
        ));
        return if index.collator.is_some() || index.multikey {
            Tightness::InexactFetch
        } else {
            Tightness::Exact
        };
    }

    // Nothing is < NaN.
    if value.is_nan() {
        return Tightness::Exact;
    }

    let (start, end) = lt_endpoints(value, index);
    let array = matches!(value, Value::Array(_));
    let start_inclusive = type_match(&start, &end) || array;
    let interval = Interval::new(start, start_inclusive, end, array);

    let tightness = inequality_tightness(&interval, value, index);
    if !interval.is_null() {
        oil.push(interval);
    }
    tightness
}

fn translate_lte(
    value: &Value,
    index: &IndexEntry,
    hashed: bool,
    oil: &mut OrderedIntervalList,
) -> BoundsResult<Tightness> {
    if matches!(value, Value::MaxKey) {
        oil.push(Interval::all_values());
        return Ok(if index.collator.is_some() {
            Tightness::InexactFetch
        } else {
            Tightness::Exact
        });
    }

    // Only NaN is <= NaN.
    if value.is_nan() {
        oil.push(Interval::point(value.clone()));
        return Ok(Tightness::Exact);
    }

    // Under type bracketing $lte: null is $eq: null.
    if value.is_null() {
        return null_equality_bounds(hashed, oil);
    }

    let (start, end) = lt_endpoints(value, index);
    let start_inclusive = matches!(value, Value::Array(_)) || type_match(&start, &end);
    let interval = Interval::new(start, start_inclusive, end, true);

    let tightness = inequality_tightness(&interval, value, index);
    oil.push(interval);
    Ok(tightness)
}

fn translate_gt(value: &Value, index: &IndexEntry, oil: &mut OrderedIntervalList) -> Tightness {
    // Everything but MinKey is > MinKey; the start stays open unless the
    // array [MinKey] may be indexed as MinKey.
    if matches!(value, Value::MinKey) {
        oil.push(Interval::all_values_respecting_inclusion(
            BoundInclusion::from_bools(index.multikey, true),
        ));
        return if index.collator.is_some() || index.multikey {
            Tightness::InexactFetch
        } else {
            Tightness::Exact
        };
    }

    // Nothing is > NaN.
    if value.is_nan() {
        return Tightness::Exact;
    }

    let (start, end) = gt_endpoints(value, index);
    let array = matches!(value, Value::Array(_));
    let end_inclusive = array || type_match(&start, &end);
    let interval = Interval::new(start, array, end, end_inclusive);

    let tightness = inequality_tightness(&interval, value, index);
    if !interval.is_null() {
        oil.push(interval);
    }
    tightness
}

fn translate_gte(
    value: &Value,
    index: &IndexEntry,
    hashed: bool,
    oil: &mut OrderedIntervalList,
) -> BoundsResult<Tightness> {
    if matches!(value, Value::MinKey) {
        oil.push(Interval::all_values());
        return Ok(if index.collator.is_some() {
            Tightness::InexactFetch
        } else {
            Tightness::Exact
        });
    }

    if value.is_nan() {
        oil.push(Interval::point(value.clone()));
        return Ok(Tightness::Exact);
    }

    if value.is_null() {
        return null_equality_bounds(hashed, oil);
    }

    let (start, end) = gt_endpoints(value, index);
    let end_inclusive = matches!(value, Value::Array(_)) || type_match(&start, &end);
    let interval = Interval::new(start, true, end, end_inclusive);

    let tightness = inequality_tightness(&interval, value, index);
    oil.push(interval);
    Ok(tightness)
}

/// Expression-language comparisons: no type bracketing, and missing sorts
/// below null, so a null operand needs care.
fn translate_internal_expr(
    op: ComparisonOp,
    value: &Value,
    index: &IndexEntry,
    oil: &mut OrderedIntervalList,
) -> Tightness {
    let key = index_key(value, index.collator());
    let null = value.is_null();

    let interval = match op {
        // [MinKey, null] picks up missing; literal nulls are filtered on fetch.
        ComparisonOp::Lt => Interval::new(Value::MinKey, true, key, null),
        ComparisonOp::Lte => Interval::new(Value::MinKey, true, key, true),
        ComparisonOp::Gt => Interval::new(key, false, Value::MaxKey, true),
        ComparisonOp::Gte | ComparisonOp::Eq => Interval::new(key, true, Value::MaxKey, true),
    };

    let tightness = match op {
        // Null and missing are both included (lte) or both excluded (gt).
        ComparisonOp::Lte | ComparisonOp::Gt if null => Tightness::Exact,
        _ => inequality_tightness(&interval, value, index),
    };

    if !interval.is_null() {
        oil.push(interval);
    }
    tightness
}

fn translate_type(
    types: &TypeSet,
    index: &IndexEntry,
    oil: &mut OrderedIntervalList,
) -> BoundsResult<Tightness> {
    // Arrays are indexed per element; only the document can tell.
    if types.has_type(BsonType::Array) {
        oil.push(Interval::all_values());
        return Ok(Tightness::InexactFetch);
    }

    // Every numeric subtype shares one bracket.
    if types.all_numbers {
        oil.push(Interval::range(
            min_for_type(BsonType::Int32),
            max_for_type(BsonType::Int32),
            BoundInclusion::IncludeBoth,
        ));
    }

    for &t in &types.types {
        // A variable-width type ends where the next bracket starts.
        let inclusion = if t.is_variable_width() {
            BoundInclusion::IncludeStartOnly
        } else {
            BoundInclusion::IncludeBoth
        };
        oil.push(Interval::range(min_for_type(t), max_for_type(t), inclusion));
    }

    let tightness = tightness_for_type_set(types, index);
    unionize(oil)?;
    Ok(tightness)
}

/// Tightness of `$type` bounds that do not involve arrays.
pub fn tightness_for_type_set(types: &TypeSet, index: &IndexEntry) -> Tightness {
    // Only strings and objects carry collation keys; other brackets stay
    // exact under a collator.
    let collatable = types.has_type(BsonType::String) || types.has_type(BsonType::Object);
    if index.collator.is_some() && collatable {
        return Tightness::InexactFetch;
    }

    if types.has_type(BsonType::Null) || types.has_type(BsonType::Undefined) {
        return Tightness::InexactFetch;
    }

    let numeric = [
        BsonType::Int32,
        BsonType::Int64,
        BsonType::Double,
        BsonType::Decimal128,
    ]
    .iter()
    .filter(|t| types.has_type(**t))
    .count();
    let all_numbers = numeric == 4 || types.all_numbers;
    if numeric > 0 && !all_numbers {
        return Tightness::InexactCovered;
    }

    // Strings and symbols share a bracket.
    if types.has_type(BsonType::String) != types.has_type(BsonType::Symbol) {
        return Tightness::InexactCovered;
    }

    Tightness::Exact
}

fn translate_in(
    list: &InList,
    index: &IndexEntry,
    hashed: bool,
    oil: &mut OrderedIntervalList,
) -> BoundsResult<Tightness> {
    let mut tightness = Tightness::Exact;

    for equality in list.equalities() {
        tightness = tightness.combine(translate_equality(equality, index, hashed, oil)?);
    }

    for regex in list.regexes() {
        let (intervals, regex_tightness) = translate_regex(regex, index.collator.is_some());
        oil.intervals.extend(intervals);
        tightness = tightness.combine(regex_tightness);
    }

    // A null key does not always mean a null value.
    if list.has_null() {
        tightness = Tightness::InexactFetch;
    }

    // Empty arrays are indexed as undefined.
    if list.has_empty_array() {
        oil.push(undefined_point(false));
        tightness = Tightness::InexactFetch;
    }

    unionize(oil)?;
    Ok(tightness)
}
