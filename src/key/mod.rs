//! Index key model
//!
//! Values, their canonical ordering, and the transforms applied before a
//! value becomes an index key:
//! - Collation: strings replaced by their comparison key
//! - Hashing: the whole value replaced by a 64-bit digest
//!
//! # Principles
//!
//! 1. Ordering is total and matches the order keys are stored in
//! 2. Types never interleave; each sorts within its canonical bracket
//! 3. Transforms are deterministic

mod collation;
mod hash;
mod types;
mod value;

pub use collation::{index_key, Collator, MockCollator, MockCollatorKind};
pub use hash::hash_key;
pub use types::{max_for_type, min_for_type, BsonType, TypeSet};
pub use value::Value;
