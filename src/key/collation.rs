//! Collation-aware key rewriting.
//!
//! A collated index stores the comparison key of each string instead of the
//! string itself. Bounds built for such an index must be expressed in the
//! same key space, so every literal is passed through [`index_key`] first.

use std::fmt;

use super::value::Value;

/// Maps a string to the key it sorts by in a collated index.
///
/// Implementations must be deterministic: equal inputs give equal keys.
pub trait Collator: fmt::Debug + Send + Sync {
    fn comparison_key(&self, s: &str) -> String;
}

/// Rewrite `value` into the form stored in the index.
///
/// `None` is the simple binary collation and leaves the value untouched.
/// Strings nested in arrays and objects are rewritten as well; symbols are
/// not collated.
pub fn index_key(value: &Value, collator: Option<&dyn Collator>) -> Value {
    let Some(collator) = collator else {
        return value.clone();
    };

    match value {
        Value::String(s) => Value::String(collator.comparison_key(s)),
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| index_key(v, Some(collator))).collect())
        }
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), index_key(v, Some(collator))))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Behaviour of a [`MockCollator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCollatorKind {
    /// Reverse the characters of the string.
    ReverseString,
    /// Lowercase the string.
    ToLowerString,
    /// Every string maps to the same key.
    AlwaysEqual,
}

/// Deterministic collator for tests and tooling.
#[derive(Debug, Clone, Copy)]
pub struct MockCollator {
    kind: MockCollatorKind,
}

impl MockCollator {
    pub fn new(kind: MockCollatorKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> MockCollatorKind {
        self.kind
    }
}

impl Collator for MockCollator {
    fn comparison_key(&self, s: &str) -> String {
        match self.kind {
            MockCollatorKind::ReverseString => s.chars().rev().collect(),
            MockCollatorKind::ToLowerString => s.to_lowercase(),
            MockCollatorKind::AlwaysEqual => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_collator_is_identity() {
        let v = Value::from_json(&json!({"a": ["Foo", 1]}));
        assert_eq!(index_key(&v, None), v);
    }

    #[test]
    fn test_reverse_collator_rewrites_nested_strings() {
        let collator = MockCollator::new(MockCollatorKind::ReverseString);
        let v = Value::from_json(&json!(["abc", {"k": "xy"}, 3]));
        let expected = Value::from_json(&json!(["cba", {"k": "yx"}, 3]));
        assert_eq!(index_key(&v, Some(&collator)), expected);
    }

    #[test]
    fn test_symbol_not_collated() {
        let collator = MockCollator::new(MockCollatorKind::ToLowerString);
        let v = Value::Symbol("ABC".into());
        assert!(matches!(index_key(&v, Some(&collator)), Value::Symbol(s) if s == "ABC"));
    }

    #[test]
    fn test_always_equal() {
        let collator = MockCollator::new(MockCollatorKind::AlwaysEqual);
        assert_eq!(
            index_key(&Value::string("a"), Some(&collator)),
            index_key(&Value::string("b"), Some(&collator))
        );
    }
}
