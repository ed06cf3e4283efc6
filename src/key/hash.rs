//! Hashed index keys.
//!
//! A hashed index stores a 64-bit digest of each value. Numbers are folded to
//! `i64` before hashing so that values which compare equal across numeric
//! subtypes land on the same key.

use sha2::{Digest, Sha256};

use super::value::Value;

/// Compute the hashed key stored for `value`.
pub fn hash_key(value: &Value) -> Value {
    let mut hasher = Sha256::new();
    feed(&mut hasher, value);
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    Value::Int64(i64::from_le_bytes(prefix))
}

fn feed(hasher: &mut Sha256, value: &Value) {
    // Rank first so that e.g. "" and [] never collide.
    hasher.update(value.canonical_rank().to_le_bytes());

    match value {
        Value::MinKey | Value::MaxKey | Value::Undefined | Value::Null => {}
        Value::Int32(i) => hasher.update(i64::from(*i).to_le_bytes()),
        Value::Int64(i) => hasher.update(i.to_le_bytes()),
        Value::Double(d) => hasher.update(fold_double(*d).to_le_bytes()),
        Value::String(s) | Value::Symbol(s) | Value::Code(s) => feed_str(hasher, s),
        Value::Object(fields) => feed_fields(hasher, fields),
        Value::Array(items) => {
            hasher.update((items.len() as u64).to_le_bytes());
            for item in items {
                feed(hasher, item);
            }
        }
        Value::BinData { subtype, bytes } => {
            hasher.update([*subtype]);
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        Value::ObjectId(bytes) => hasher.update(bytes),
        Value::Bool(b) => hasher.update([u8::from(*b)]),
        Value::Date(ms) => hasher.update(ms.to_le_bytes()),
        Value::Timestamp(t) => hasher.update(t.to_le_bytes()),
        Value::Regex { pattern, flags } => {
            feed_str(hasher, pattern);
            feed_str(hasher, flags);
        }
        Value::CodeWithScope { code, scope } => {
            feed_str(hasher, code);
            feed_fields(hasher, scope);
        }
    }
}

fn feed_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn feed_fields(hasher: &mut Sha256, fields: &[(String, Value)]) {
    hasher.update((fields.len() as u64).to_le_bytes());
    for (name, v) in fields {
        feed_str(hasher, name);
        feed(hasher, v);
    }
}

/// Truncate toward zero, saturating at the i64 range. NaN folds to i64::MIN.
fn fold_double(d: f64) -> i64 {
    if d.is_nan() {
        i64::MIN
    } else {
        // `as` saturates for out-of-range floats.
        d as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_int64() {
        assert!(matches!(hash_key(&Value::string("a")), Value::Int64(_)));
    }

    #[test]
    fn test_numeric_subtypes_collide() {
        let a = hash_key(&Value::Int32(1));
        let b = hash_key(&Value::Int64(1));
        let c = hash_key(&Value::Double(1.0));
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_distinct_values_distinct_hashes() {
        assert_ne!(hash_key(&Value::Null), hash_key(&Value::Undefined));
        assert_ne!(hash_key(&Value::string("")), hash_key(&Value::Array(vec![])));
        assert_ne!(hash_key(&Value::string("a")), hash_key(&Value::string("b")));
    }

    #[test]
    fn test_deterministic() {
        let v = Value::Array(vec![Value::Int32(1), Value::string("x")]);
        assert_eq!(hash_key(&v), hash_key(&v.clone()));
    }
}
