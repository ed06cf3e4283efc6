//! Predicate tree consumed by the bounds builder.
//!
//! Parsing happens upstream; this module only defines the closed set of
//! node kinds and convenience constructors.

use std::fmt;

use crate::key::{TypeSet, Value};

/// Type-bracketed comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl ComparisonOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "$eq",
            ComparisonOp::Lt => "$lt",
            ComparisonOp::Lte => "$lte",
            ComparisonOp::Gt => "$gt",
            ComparisonOp::Gte => "$gte",
        }
    }

    /// Operator name in its expression-language form (`$_internalExprLt`, ...).
    pub fn internal_expr_name(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "$_internalExprEq",
            ComparisonOp::Lt => "$_internalExprLt",
            ComparisonOp::Lte => "$_internalExprLte",
            ComparisonOp::Gt => "$_internalExprGt",
            ComparisonOp::Gte => "$_internalExprGte",
        }
    }
}

/// A regular expression operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexMatch {
    pub pattern: String,
    pub flags: String,
}

impl RegexMatch {
    pub fn new(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            flags: flags.into(),
        }
    }

    /// The regex as a stored value; regexes are indexed as themselves.
    pub fn as_value(&self) -> Value {
        Value::regex(self.pattern.clone(), self.flags.clone())
    }

    /// Compile for re-checking index keys.
    ///
    /// Supports the `i`, `m`, `s` and `x` flags. Patterns using syntax the
    /// engine lacks (such as `\Q...\E`) fail to compile; callers fall back to
    /// fetching the document.
    pub fn compile(&self) -> Result<regex::Regex, regex::Error> {
        let mut builder = regex::RegexBuilder::new(&self.pattern);
        for flag in self.flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'x' => {
                    builder.ignore_whitespace(true);
                }
                _ => {}
            }
        }
        builder.build()
    }

    /// Re-check an index key against this regex. Only strings and symbols
    /// can match. `None` when the pattern does not compile.
    pub fn matches_key(&self, key: &Value) -> Option<bool> {
        let re = self.compile().ok()?;
        Some(match key {
            Value::String(s) | Value::Symbol(s) => re.is_match(s),
            _ => false,
        })
    }
}

impl fmt::Display for RegexMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.flags)
    }
}

/// Operand of `$in`: literal equalities plus regexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InList {
    /// Sorted and deduplicated.
    equalities: Vec<Value>,
    regexes: Vec<RegexMatch>,
}

impl InList {
    /// Split `values` into equalities and regexes. Regex values match by
    /// pattern rather than by equality.
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        let mut equalities = Vec::new();
        let mut regexes = Vec::new();
        for value in values {
            match value {
                Value::Regex { pattern, flags } => regexes.push(RegexMatch { pattern, flags }),
                other => equalities.push(other),
            }
        }
        equalities.sort();
        equalities.dedup();
        Self {
            equalities,
            regexes,
        }
    }

    pub fn from_json(values: &[serde_json::Value]) -> Self {
        Self::new(values.iter().map(Value::from_json))
    }

    pub fn equalities(&self) -> &[Value] {
        &self.equalities
    }

    pub fn regexes(&self) -> &[RegexMatch] {
        &self.regexes
    }

    pub fn has_null(&self) -> bool {
        self.equalities.iter().any(Value::is_null)
    }

    pub fn has_empty_array(&self) -> bool {
        self.equalities.iter().any(Value::is_empty_array)
    }

    pub fn len(&self) -> usize {
        self.equalities.len() + self.regexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An opaque region description handed to the geo coverer.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRegion(pub serde_json::Value);

/// Geometry of a geo predicate, in whichever forms the parser produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoPredicate {
    /// Flat (2d) region.
    pub planar: Option<GeoRegion>,
    /// Spherical (2dsphere) region.
    pub spherical: Option<GeoRegion>,
}

impl GeoPredicate {
    pub fn planar(region: serde_json::Value) -> Self {
        Self {
            planar: Some(GeoRegion(region)),
            spherical: None,
        }
    }

    pub fn spherical(region: serde_json::Value) -> Self {
        Self {
            planar: None,
            spherical: Some(GeoRegion(region)),
        }
    }
}

/// A predicate on one field.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchExpression {
    /// Type-bracketed comparison.
    Comparison {
        path: String,
        op: ComparisonOp,
        value: Value,
    },
    /// Expression-language comparison: no type bracketing, missing sorts
    /// below null.
    InternalExpr {
        path: String,
        op: ComparisonOp,
        value: Value,
    },
    Regex {
        path: String,
        regex: RegexMatch,
    },
    In {
        path: String,
        list: InList,
    },
    Type {
        path: String,
        types: TypeSet,
    },
    /// `$exists: true`; `$exists: false` is `Not(Exists)`.
    Exists {
        path: String,
    },
    Mod {
        path: String,
        divisor: i64,
        remainder: i64,
    },
    Not(Box<MatchExpression>),
    /// `$elemMatch` over array values.
    ElemMatchValue {
        path: String,
        children: Vec<MatchExpression>,
    },
    Geo {
        path: String,
        geo: GeoPredicate,
    },
    /// Geo containment over time-series buckets.
    BucketGeoWithin {
        path: String,
        geo: GeoPredicate,
    },
}

impl MatchExpression {
    fn comparison(path: impl Into<String>, op: ComparisonOp, value: impl Into<Value>) -> Self {
        MatchExpression::Comparison {
            path: path.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::comparison(path, ComparisonOp::Eq, value)
    }

    pub fn lt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::comparison(path, ComparisonOp::Lt, value)
    }

    pub fn lte(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::comparison(path, ComparisonOp::Lte, value)
    }

    pub fn gt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::comparison(path, ComparisonOp::Gt, value)
    }

    pub fn gte(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::comparison(path, ComparisonOp::Gte, value)
    }

    /// `$ne` is the negation of `$eq`.
    pub fn ne(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::not(Self::eq(path, value))
    }

    pub fn internal_expr(
        path: impl Into<String>,
        op: ComparisonOp,
        value: impl Into<Value>,
    ) -> Self {
        MatchExpression::InternalExpr {
            path: path.into(),
            op,
            value: value.into(),
        }
    }

    pub fn regex(
        path: impl Into<String>,
        pattern: impl Into<String>,
        flags: impl Into<String>,
    ) -> Self {
        MatchExpression::Regex {
            path: path.into(),
            regex: RegexMatch::new(pattern, flags),
        }
    }

    pub fn in_list(path: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        MatchExpression::In {
            path: path.into(),
            list: InList::new(values),
        }
    }

    /// `$nin` is the negation of `$in`.
    pub fn nin(path: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        Self::not(Self::in_list(path, values))
    }

    pub fn type_of(path: impl Into<String>, types: TypeSet) -> Self {
        MatchExpression::Type {
            path: path.into(),
            types,
        }
    }

    pub fn exists(path: impl Into<String>) -> Self {
        MatchExpression::Exists { path: path.into() }
    }

    pub fn not_exists(path: impl Into<String>) -> Self {
        Self::not(Self::exists(path))
    }

    pub fn modulo(path: impl Into<String>, divisor: i64, remainder: i64) -> Self {
        MatchExpression::Mod {
            path: path.into(),
            divisor,
            remainder,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: MatchExpression) -> Self {
        MatchExpression::Not(Box::new(child))
    }

    pub fn elem_match(path: impl Into<String>, children: Vec<MatchExpression>) -> Self {
        MatchExpression::ElemMatchValue {
            path: path.into(),
            children,
        }
    }

    pub fn geo(path: impl Into<String>, geo: GeoPredicate) -> Self {
        MatchExpression::Geo {
            path: path.into(),
            geo,
        }
    }

    pub fn bucket_geo_within(path: impl Into<String>, geo: GeoPredicate) -> Self {
        MatchExpression::BucketGeoWithin {
            path: path.into(),
            geo,
        }
    }

    /// Field path the predicate applies to. A negation applies to its child's path.
    pub fn path(&self) -> &str {
        match self {
            MatchExpression::Comparison { path, .. }
            | MatchExpression::InternalExpr { path, .. }
            | MatchExpression::Regex { path, .. }
            | MatchExpression::In { path, .. }
            | MatchExpression::Type { path, .. }
            | MatchExpression::Exists { path }
            | MatchExpression::Mod { path, .. }
            | MatchExpression::ElemMatchValue { path, .. }
            | MatchExpression::Geo { path, .. }
            | MatchExpression::BucketGeoWithin { path, .. } => path,
            MatchExpression::Not(child) => child.path(),
        }
    }

    /// Decide a covered predicate from an index key alone.
    ///
    /// Returns `None` when the key cannot settle the predicate and the
    /// document must be fetched.
    pub fn matches_index_key(&self, key: &Value) -> Option<bool> {
        match self {
            MatchExpression::Regex { regex, .. } => regex.matches_key(key),
            MatchExpression::In { list, .. } if list.equalities().is_empty() => {
                let mut matched = false;
                for regex in list.regexes() {
                    matched |= regex.matches_key(key)?;
                }
                Some(matched)
            }
            _ => None,
        }
    }

    /// Short name of the node kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            MatchExpression::Comparison { op, .. } => op.as_str(),
            MatchExpression::InternalExpr { op, .. } => op.internal_expr_name(),
            MatchExpression::Regex { .. } => "$regex",
            MatchExpression::In { .. } => "$in",
            MatchExpression::Type { .. } => "$type",
            MatchExpression::Exists { .. } => "$exists",
            MatchExpression::Mod { .. } => "$mod",
            MatchExpression::Not(_) => "$not",
            MatchExpression::ElemMatchValue { .. } => "$elemMatch",
            MatchExpression::Geo { .. } => "$geoWithin",
            MatchExpression::BucketGeoWithin { .. } => "$_internalBucketGeoWithin",
        }
    }

    /// True for `$eq null`, `$lte null`, `$gte null` (equivalent under type
    /// bracketing) and for an `$in` containing null.
    pub fn is_equality_or_in_null(&self) -> bool {
        match self {
            MatchExpression::Comparison {
                op: ComparisonOp::Eq | ComparisonOp::Lte | ComparisonOp::Gte,
                value,
                ..
            } => value.is_null(),
            MatchExpression::In { list, .. } => list.has_null(),
            _ => false,
        }
    }
}

impl fmt::Display for MatchExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchExpression::Comparison { path, value, .. }
            | MatchExpression::InternalExpr { path, value, .. } => {
                write!(f, "{} {} {}", path, self.kind_name(), value)
            }
            MatchExpression::Regex { path, regex } => write!(f, "{} $regex {}", path, regex),
            MatchExpression::In { path, list } => {
                write!(f, "{} $in [", path)?;
                let mut first = true;
                for v in list.equalities() {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{}", v)?;
                }
                for r in list.regexes() {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{}", r)?;
                }
                write!(f, "]")
            }
            MatchExpression::Type { path, types } => {
                write!(f, "{} $type [", path)?;
                let mut names: Vec<&str> = types.types.iter().map(|t| t.name()).collect();
                if types.all_numbers {
                    names.insert(0, "number");
                }
                write!(f, "{}]", names.join(", "))
            }
            MatchExpression::Exists { path } => write!(f, "{} $exists true", path),
            MatchExpression::Mod {
                path,
                divisor,
                remainder,
            } => write!(f, "{} $mod [{}, {}]", path, divisor, remainder),
            MatchExpression::Not(child) => write!(f, "$not ({})", child),
            MatchExpression::ElemMatchValue { path, children } => {
                write!(f, "{} $elemMatch (", path)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            MatchExpression::Geo { path, geo } | MatchExpression::BucketGeoWithin { path, geo } => {
                let region = geo
                    .spherical
                    .as_ref()
                    .or(geo.planar.as_ref())
                    .map(|r| r.0.to_string())
                    .unwrap_or_else(|| "<no region>".to_string());
                write!(f, "{} {} {}", path, self.kind_name(), region)
            }
        }
    }
}
