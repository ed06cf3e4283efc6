//! Value types, canonical type brackets and per-type domain bounds.
//!
//! Index keys of different types never interleave: every type belongs to a
//! canonical bracket and brackets are totally ordered. Numbers share one
//! bracket, as do strings and symbols.

use std::collections::BTreeSet;
use std::fmt;

use super::value::Value;

/// Type tag of a document value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BsonType {
    MinKey,
    Undefined,
    Null,
    Int32,
    Int64,
    Double,
    /// Named for type sets only; decimal values are not modelled.
    Decimal128,
    String,
    Symbol,
    Object,
    Array,
    BinData,
    ObjectId,
    Bool,
    Date,
    Timestamp,
    Regex,
    Code,
    CodeWithScope,
    MaxKey,
}

impl BsonType {
    /// Rank of the canonical bracket this type sorts in.
    pub fn canonical_rank(self) -> i32 {
        match self {
            BsonType::MinKey => -1,
            BsonType::Undefined => 0,
            BsonType::Null => 5,
            BsonType::Int32 | BsonType::Int64 | BsonType::Double | BsonType::Decimal128 => 10,
            BsonType::String | BsonType::Symbol => 15,
            BsonType::Object => 20,
            BsonType::Array => 25,
            BsonType::BinData => 30,
            BsonType::ObjectId => 35,
            BsonType::Bool => 40,
            BsonType::Date => 45,
            BsonType::Timestamp => 47,
            BsonType::Regex => 50,
            BsonType::Code => 60,
            BsonType::CodeWithScope => 65,
            BsonType::MaxKey => 127,
        }
    }

    pub fn is_number(self) -> bool {
        matches!(
            self,
            BsonType::Int32 | BsonType::Int64 | BsonType::Double | BsonType::Decimal128
        )
    }

    /// Types whose upper domain bound is the smallest value of the next
    /// bracket, so a range over the whole type must exclude its end.
    pub fn is_variable_width(self) -> bool {
        matches!(
            self,
            BsonType::String
                | BsonType::Symbol
                | BsonType::Object
                | BsonType::Array
                | BsonType::BinData
                | BsonType::Regex
                | BsonType::Code
                | BsonType::CodeWithScope
        )
    }

    /// Alias used by `$type`.
    pub fn name(self) -> &'static str {
        match self {
            BsonType::MinKey => "minKey",
            BsonType::Undefined => "undefined",
            BsonType::Null => "null",
            BsonType::Int32 => "int",
            BsonType::Int64 => "long",
            BsonType::Double => "double",
            BsonType::Decimal128 => "decimal",
            BsonType::String => "string",
            BsonType::Symbol => "symbol",
            BsonType::Object => "object",
            BsonType::Array => "array",
            BsonType::BinData => "binData",
            BsonType::ObjectId => "objectId",
            BsonType::Bool => "bool",
            BsonType::Date => "date",
            BsonType::Timestamp => "timestamp",
            BsonType::Regex => "regex",
            BsonType::Code => "javascript",
            BsonType::CodeWithScope => "javascriptWithScope",
            BsonType::MaxKey => "maxKey",
        }
    }

    /// Parse a `$type` alias.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_TYPES.iter().copied().find(|t| t.name() == name)
    }
}

const ALL_TYPES: [BsonType; 20] = [
    BsonType::MinKey,
    BsonType::Undefined,
    BsonType::Null,
    BsonType::Int32,
    BsonType::Int64,
    BsonType::Double,
    BsonType::Decimal128,
    BsonType::String,
    BsonType::Symbol,
    BsonType::Object,
    BsonType::Array,
    BsonType::BinData,
    BsonType::ObjectId,
    BsonType::Bool,
    BsonType::Date,
    BsonType::Timestamp,
    BsonType::Regex,
    BsonType::Code,
    BsonType::CodeWithScope,
    BsonType::MaxKey,
];

impl fmt::Display for BsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Smallest value of the bracket containing `t`.
pub fn min_for_type(t: BsonType) -> Value {
    match t {
        BsonType::MinKey => Value::MinKey,
        BsonType::Undefined => Value::Undefined,
        BsonType::Null => Value::Null,
        // NaN sorts below every other number.
        BsonType::Int32 | BsonType::Int64 | BsonType::Double | BsonType::Decimal128 => {
            Value::Double(f64::NAN)
        }
        BsonType::String | BsonType::Symbol => Value::String(String::new()),
        BsonType::Object => Value::Object(Vec::new()),
        BsonType::Array => Value::Array(Vec::new()),
        BsonType::BinData => Value::BinData {
            subtype: 0,
            bytes: Vec::new(),
        },
        BsonType::ObjectId => Value::ObjectId([0u8; 12]),
        BsonType::Bool => Value::Bool(false),
        BsonType::Date => Value::Date(i64::MIN),
        BsonType::Timestamp => Value::Timestamp(0),
        BsonType::Regex => Value::Regex {
            pattern: String::new(),
            flags: String::new(),
        },
        BsonType::Code => Value::Code(String::new()),
        BsonType::CodeWithScope => Value::CodeWithScope {
            code: String::new(),
            scope: Vec::new(),
        },
        BsonType::MaxKey => Value::MaxKey,
    }
}

/// Largest value of the bracket containing `t`. For variable-width types
/// this is the minimum of the following bracket.
pub fn max_for_type(t: BsonType) -> Value {
    match t {
        BsonType::MinKey => Value::MinKey,
        BsonType::Undefined => Value::Undefined,
        BsonType::Null => Value::Null,
        BsonType::Int32 | BsonType::Int64 | BsonType::Double | BsonType::Decimal128 => {
            Value::Double(f64::INFINITY)
        }
        BsonType::String | BsonType::Symbol => min_for_type(BsonType::Object),
        BsonType::Object => min_for_type(BsonType::Array),
        BsonType::Array => min_for_type(BsonType::BinData),
        BsonType::BinData => min_for_type(BsonType::ObjectId),
        BsonType::ObjectId => Value::ObjectId([0xffu8; 12]),
        BsonType::Bool => Value::Bool(true),
        BsonType::Date => Value::Date(i64::MAX),
        BsonType::Timestamp => Value::Timestamp(u64::MAX),
        BsonType::Regex => min_for_type(BsonType::Code),
        BsonType::Code => min_for_type(BsonType::CodeWithScope),
        BsonType::CodeWithScope => min_for_type(BsonType::MaxKey),
        BsonType::MaxKey => Value::MaxKey,
    }
}

/// Set of types named by a `$type` predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSet {
    /// `$type: "number"` was given.
    pub all_numbers: bool,
    pub types: BTreeSet<BsonType>,
}

impl TypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type set matching every numeric subtype.
    pub fn numbers() -> Self {
        Self {
            all_numbers: true,
            types: BTreeSet::new(),
        }
    }

    pub fn of(types: impl IntoIterator<Item = BsonType>) -> Self {
        Self {
            all_numbers: false,
            types: types.into_iter().collect(),
        }
    }

    pub fn with_type(mut self, t: BsonType) -> Self {
        self.types.insert(t);
        self
    }

    /// Parse aliases as `$type` accepts them; `"number"` sets `all_numbers`.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut set = Self::new();
        for name in names {
            if name == "number" {
                set.all_numbers = true;
            } else {
                set.types.insert(BsonType::from_name(name)?);
            }
        }
        Some(set)
    }

    pub fn has_type(&self, t: BsonType) -> bool {
        self.types.contains(&t)
    }

    pub fn is_empty(&self) -> bool {
        !self.all_numbers && self.types.is_empty()
    }
}
