//! Document value model and its index ordering.
//!
//! Ordering is the one an index scan observes: values compare by canonical
//! type bracket first, then within the bracket. Numbers compare numerically
//! across `Int32`, `Int64` and `Double`, with NaN below every other number
//! and equal to itself. Equality follows the ordering, so `Int32(1)` equals
//! `Double(1.0)`.

use std::cmp::Ordering;
use std::fmt;

use super::types::BsonType;

/// A document value as stored in an index key.
#[derive(Debug, Clone)]
pub enum Value {
    MinKey,
    Undefined,
    Null,
    Int32(i32),
    Int64(i64),
    Double(f64),
    Symbol(String),
    String(String),
    /// Fields in document order.
    Object(Vec<(String, Value)>),
    Array(Vec<Value>),
    BinData { subtype: u8, bytes: Vec<u8> },
    ObjectId([u8; 12]),
    Bool(bool),
    /// Milliseconds since the epoch.
    Date(i64),
    Timestamp(u64),
    Regex { pattern: String, flags: String },
    Code(String),
    CodeWithScope {
        code: String,
        scope: Vec<(String, Value)>,
    },
    MaxKey,
}

impl Value {
    pub fn bson_type(&self) -> BsonType {
        match self {
            Value::MinKey => BsonType::MinKey,
            Value::Undefined => BsonType::Undefined,
            Value::Null => BsonType::Null,
            Value::Int32(_) => BsonType::Int32,
            Value::Int64(_) => BsonType::Int64,
            Value::Double(_) => BsonType::Double,
            Value::Symbol(_) => BsonType::Symbol,
            Value::String(_) => BsonType::String,
            Value::Object(_) => BsonType::Object,
            Value::Array(_) => BsonType::Array,
            Value::BinData { .. } => BsonType::BinData,
            Value::ObjectId(_) => BsonType::ObjectId,
            Value::Bool(_) => BsonType::Bool,
            Value::Date(_) => BsonType::Date,
            Value::Timestamp(_) => BsonType::Timestamp,
            Value::Regex { .. } => BsonType::Regex,
            Value::Code(_) => BsonType::Code,
            Value::CodeWithScope { .. } => BsonType::CodeWithScope,
            Value::MaxKey => BsonType::MaxKey,
        }
    }

    pub fn canonical_rank(&self) -> i32 {
        self.bson_type().canonical_rank()
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int32(_) | Value::Int64(_) | Value::Double(_))
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Double(d) if d.is_nan())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_empty_array(&self) -> bool {
        matches!(self, Value::Array(items) if items.is_empty())
    }

    /// True if a collator would rewrite this value (it is, or contains, a string).
    pub fn is_collatable(&self) -> bool {
        match self {
            Value::String(_) => true,
            Value::Array(items) => items.iter().any(Value::is_collatable),
            Value::Object(fields) => fields.iter().any(|(_, v)| v.is_collatable()),
            _ => false,
        }
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn regex(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        Value::Regex {
            pattern: pattern.into(),
            flags: flags.into(),
        }
    }

    /// Convert a JSON value.
    ///
    /// Integers that fit in 32 bits become `Int32`, then `Int64`, everything
    /// else `Double`. Object fields keep the order serde_json yields them in.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    match i32::try_from(i) {
                        Ok(small) => Value::Int32(small),
                        Err(_) => Value::Int64(i),
                    }
                } else {
                    Value::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::from_json(&value)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        // -0.0 and 0.0 compare equal.
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison of an integer against a double, without rounding the
/// integer through f64.
fn compare_i64_f64(i: i64, d: f64) -> Ordering {
    if d.is_nan() {
        return Ordering::Greater;
    }
    // 2^63 is exactly representable; i64 covers [-2^63, 2^63).
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if d >= TWO_POW_63 {
        return Ordering::Less;
    }
    if d < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let whole = d.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => compare_f64(0.0, d - whole),
        other => other,
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Double(x), Value::Double(y)) => compare_f64(*x, *y),
        (Value::Double(x), other) => compare_i64_f64(integer_of(other), *x).reverse(),
        (other, Value::Double(y)) => compare_i64_f64(integer_of(other), *y),
        (x, y) => integer_of(x).cmp(&integer_of(y)),
    }
}

fn integer_of(v: &Value) -> i64 {
    match v {
        Value::Int32(i) => i64::from(*i),
        Value::Int64(i) => *i,
        _ => 0,
    }
}

fn text_of(v: &Value) -> &str {
    match v {
        Value::String(s) | Value::Symbol(s) => s,
        _ => "",
    }
}

/// Compare two documents field by field: type bracket, then name, then value.
fn compare_fields(a: &[(String, Value)], b: &[(String, Value)]) -> Ordering {
    for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
        let ord = va
            .canonical_rank()
            .cmp(&vb.canonical_rank())
            .then_with(|| ka.cmp(kb))
            .then_with(|| va.cmp(vb));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = self.canonical_rank().cmp(&other.canonical_rank());
        if rank != Ordering::Equal {
            return rank;
        }

        match (self, other) {
            (a, b) if a.is_number() => compare_numbers(a, b),
            (Value::String(_) | Value::Symbol(_), b) => text_of(self).cmp(text_of(b)),
            (Value::Object(a), Value::Object(b)) => compare_fields(a, b),
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (
                Value::BinData {
                    subtype: sa,
                    bytes: ba,
                },
                Value::BinData {
                    subtype: sb,
                    bytes: bb,
                },
            ) => ba
                .len()
                .cmp(&bb.len())
                .then_with(|| sa.cmp(sb))
                .then_with(|| ba.cmp(bb)),
            (Value::ObjectId(a), Value::ObjectId(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (
                Value::Regex {
                    pattern: pa,
                    flags: fa,
                },
                Value::Regex {
                    pattern: pb,
                    flags: fb,
                },
            ) => pa.cmp(pb).then_with(|| fa.cmp(fb)),
            (Value::Code(a), Value::Code(b)) => a.cmp(b),
            (
                Value::CodeWithScope { code: ca, scope: sa },
                Value::CodeWithScope { code: cb, scope: sb },
            ) => ca.cmp(cb).then_with(|| compare_fields(sa, sb)),
            // MinKey, MaxKey, Undefined and Null are single-valued brackets.
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[(String, Value)]) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (k, v)) in fields.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, " {}: {}", k, v)?;
    }
    if !fields.is_empty() {
        write!(f, " ")?;
    }
    write!(f, "}}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::MinKey => write!(f, "MinKey"),
            Value::MaxKey => write!(f, "MaxKey"),
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Int32(i) => write!(f, "{}", i),
            Value::Int64(i) => write!(f, "{}", i),
            Value::Double(d) if d.is_nan() => write!(f, "nan"),
            Value::Double(d) if d.is_infinite() => {
                write!(f, "{}", if *d > 0.0 { "inf" } else { "-inf" })
            }
            Value::Double(d) => write!(f, "{:?}", d),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Symbol(s) => write!(f, "Symbol({:?})", s),
            Value::Object(fields) => write_fields(f, fields),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::BinData { subtype, bytes } => {
                write!(f, "BinData({}, ", subtype)?;
                for b in bytes {
                    write!(f, "{:02X}", b)?;
                }
                write!(f, ")")
            }
            Value::ObjectId(bytes) => {
                write!(f, "ObjectId('")?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                write!(f, "')")
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(ms) => write!(f, "new Date({})", ms),
            Value::Timestamp(t) => write!(f, "Timestamp({}, {})", t >> 32, t & 0xffff_ffff),
            Value::Regex { pattern, flags } => write!(f, "/{}/{}", pattern, flags),
            Value::Code(code) => write!(f, "function {{ {} }}", code),
            Value::CodeWithScope { code, scope } => {
                write!(f, "function {{ {} }} with scope ", code)?;
                write_fields(f, scope)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bracket_ordering() {
        let values = vec![
            Value::MinKey,
            Value::Undefined,
            Value::Null,
            Value::Double(f64::NAN),
            Value::Double(f64::NEG_INFINITY),
            Value::Int32(-5),
            Value::Int64(7),
            Value::Double(f64::INFINITY),
            Value::string(""),
            Value::string("abc"),
            Value::Object(vec![]),
            Value::Array(vec![]),
            Value::BinData {
                subtype: 0,
                bytes: vec![],
            },
            Value::ObjectId([0; 12]),
            Value::Bool(false),
            Value::Bool(true),
            Value::Date(0),
            Value::Timestamp(1),
            Value::regex("a", ""),
            Value::Code(String::new()),
            Value::MaxKey,
        ];

        for pair in values.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_numbers_compare_across_subtypes() {
        assert_eq!(Value::Int32(1), Value::Double(1.0));
        assert_eq!(Value::Int64(3), Value::Int32(3));
        assert!(Value::Int32(1) < Value::Double(1.5));
        assert!(Value::Double(-0.5) < Value::Int64(0));
        assert_eq!(Value::Double(0.0), Value::Double(-0.0));
        assert!(Value::Int64(i64::MAX) < Value::Double(9.3e18));
        assert!(Value::Int64(i64::MIN) > Value::Double(-9.3e18));
    }

    #[test]
    fn test_large_integers_not_rounded() {
        // 2^53 + 1 is not representable as f64.
        let big = (1i64 << 53) + 1;
        assert!(Value::Int64(big) > Value::Double((1i64 << 53) as f64));
    }

    #[test]
    fn test_nan_is_smallest_number() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert!(Value::Double(f64::NAN) < Value::Int64(i64::MIN));
        assert!(Value::Double(f64::NAN) > Value::Null);
    }

    #[test]
    fn test_string_and_symbol_share_bracket() {
        assert_eq!(Value::string("a"), Value::Symbol("a".into()));
        assert!(Value::Symbol("a".into()) < Value::string("b"));
    }

    #[test]
    fn test_array_lexicographic() {
        let a = Value::from_json(&json!([1, 2]));
        let b = Value::from_json(&json!([1, 3]));
        let c = Value::from_json(&json!([1, 2, 0]));
        assert!(a < b);
        assert!(a < c);
        assert!(c < b);
    }

    #[test]
    fn test_object_compares_field_names() {
        let a = Value::from_json(&json!({"a": 1}));
        let b = Value::from_json(&json!({"b": 0}));
        assert!(a < b);
        let c = Value::from_json(&json!({"a": "x"}));
        assert!(a < c, "type bracket decides before value");
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from_json(&json!(null)), Value::Null);
        assert!(matches!(Value::from_json(&json!(5)), Value::Int32(5)));
        assert!(matches!(
            Value::from_json(&json!(5_000_000_000i64)),
            Value::Int64(5_000_000_000)
        ));
        assert!(matches!(Value::from_json(&json!(2.5)), Value::Double(_)));
        assert!(Value::from_json(&json!([])).is_empty_array());
    }

    #[test]
    fn test_collatable() {
        assert!(Value::string("a").is_collatable());
        assert!(Value::from_json(&json!([1, {"x": "y"}])).is_collatable());
        assert!(!Value::Symbol("a".into()).is_collatable());
        assert!(!Value::Int32(1).is_collatable());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::string("ab").to_string(), "\"ab\"");
        assert_eq!(Value::Double(f64::INFINITY).to_string(), "inf");
        assert_eq!(Value::Double(5.0).to_string(), "5.0");
        assert_eq!(Value::from_json(&json!([1, "a"])).to_string(), "[1, \"a\"]");
        assert_eq!(Value::from_json(&json!({"a": 1})).to_string(), "{ a: 1 }");
        assert_eq!(Value::regex("^a", "i").to_string(), "/^a/i");
    }
}
