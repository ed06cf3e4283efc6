//! Index descriptor as seen by the bounds builder.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::key::Collator;

/// Per-field option in a key pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOption {
    Ascending,
    Descending,
    Hashed,
    Geo2d,
    Geo2dSphere,
    Geo2dSphereBucket,
    Text,
}

impl KeyOption {
    /// +1 or -1. Non-numeric options scan ascending.
    pub fn direction(self) -> i32 {
        match self {
            KeyOption::Descending => -1,
            _ => 1,
        }
    }

    pub fn is_hashed(self) -> bool {
        self == KeyOption::Hashed
    }

    /// Parse the value of a key pattern field: `1`, `-1` or a plugin name.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => {
                let d = n.as_f64()?;
                Some(if d >= 0.0 {
                    KeyOption::Ascending
                } else {
                    KeyOption::Descending
                })
            }
            serde_json::Value::String(s) => match s.as_str() {
                "hashed" => Some(KeyOption::Hashed),
                "2d" => Some(KeyOption::Geo2d),
                "2dsphere" => Some(KeyOption::Geo2dSphere),
                "2dsphere_bucket" => Some(KeyOption::Geo2dSphereBucket),
                "text" => Some(KeyOption::Text),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for KeyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyOption::Ascending => write!(f, "1"),
            KeyOption::Descending => write!(f, "-1"),
            KeyOption::Hashed => write!(f, "\"hashed\""),
            KeyOption::Geo2d => write!(f, "\"2d\""),
            KeyOption::Geo2dSphere => write!(f, "\"2dsphere\""),
            KeyOption::Geo2dSphereBucket => write!(f, "\"2dsphere_bucket\""),
            KeyOption::Text => write!(f, "\"text\""),
        }
    }
}

/// One field of a key pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedField {
    pub name: String,
    pub option: KeyOption,
}

impl IndexedField {
    pub fn new(name: impl Into<String>, option: KeyOption) -> Self {
        Self {
            name: name.into(),
            option,
        }
    }

    pub fn ascending(name: impl Into<String>) -> Self {
        Self::new(name, KeyOption::Ascending)
    }
}

/// Ordered list of indexed fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPattern {
    fields: Vec<IndexedField>,
}

impl KeyPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, option: KeyOption) -> Self {
        self.fields.push(IndexedField::new(name, option));
        self
    }

    pub fn ascending(self, name: impl Into<String>) -> Self {
        self.field(name, KeyOption::Ascending)
    }

    pub fn descending(self, name: impl Into<String>) -> Self {
        self.field(name, KeyOption::Descending)
    }

    /// Build from `(name, option)` pairs as they appear in an index spec,
    /// e.g. `[("a", json!(1)), ("b", json!("hashed"))]`. Returns `None` for
    /// an unknown option.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, serde_json::Value)>,
    ) -> Option<Self> {
        let mut pattern = Self::new();
        for (name, option) in pairs {
            pattern = pattern.field(name, KeyOption::from_json(&option)?);
        }
        Some(pattern)
    }

    pub fn fields(&self) -> &[IndexedField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&IndexedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {}", field.name, field.option)?;
        }
        if !self.fields.is_empty() {
            write!(f, " ")?;
        }
        write!(f, "}}")
    }
}

/// Kind of index, derived from its key pattern or declared explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    Btree,
    Hashed,
    /// Path-projecting `$**` index.
    Wildcard,
    Geo2d,
    Geo2dSphere,
    Geo2dSphereBucket,
    Text,
}

impl IndexType {
    fn infer(pattern: &KeyPattern) -> Self {
        for field in pattern.fields() {
            match field.option {
                KeyOption::Hashed => return IndexType::Hashed,
                KeyOption::Geo2d => return IndexType::Geo2d,
                KeyOption::Geo2dSphere => return IndexType::Geo2dSphere,
                KeyOption::Geo2dSphereBucket => return IndexType::Geo2dSphereBucket,
                KeyOption::Text => return IndexType::Text,
                KeyOption::Ascending | KeyOption::Descending => {}
            }
        }
        if pattern.fields().iter().any(|f| f.name.ends_with("$**")) {
            return IndexType::Wildcard;
        }
        IndexType::Btree
    }
}

/// Read-only description of the index bounds are built for.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub name: String,
    pub key_pattern: KeyPattern,
    pub index_type: IndexType,
    /// Some document produced more than one key.
    pub multikey: bool,
    /// Path prefixes known to traverse an array. `None` when untracked.
    pub multikey_paths: Option<BTreeSet<String>>,
    pub sparse: bool,
    pub collator: Option<Arc<dyn Collator>>,
}

impl IndexEntry {
    pub fn new(name: impl Into<String>, key_pattern: KeyPattern) -> Self {
        let index_type = IndexType::infer(&key_pattern);
        Self {
            name: name.into(),
            key_pattern,
            index_type,
            multikey: false,
            multikey_paths: None,
            sparse: false,
            collator: None,
        }
    }

    pub fn with_type(mut self, index_type: IndexType) -> Self {
        self.index_type = index_type;
        self
    }

    pub fn with_multikey(mut self, multikey: bool) -> Self {
        self.multikey = multikey;
        self
    }

    /// Record which path prefixes are arrays; implies `multikey` if any.
    pub fn with_multikey_paths<'a>(mut self, paths: impl IntoIterator<Item = &'a str>) -> Self {
        let set: BTreeSet<String> = paths.into_iter().map(str::to_string).collect();
        self.multikey = self.multikey || !set.is_empty();
        self.multikey_paths = Some(set);
        self
    }

    pub fn with_sparse(mut self, sparse: bool) -> Self {
        self.sparse = sparse;
        self
    }

    pub fn with_collator(mut self, collator: Arc<dyn Collator>) -> Self {
        self.collator = Some(collator);
        self
    }

    pub fn collator(&self) -> Option<&dyn Collator> {
        self.collator.as_deref()
    }

    pub fn num_fields(&self) -> usize {
        self.key_pattern.len()
    }

    /// True if any prefix of `path` may traverse an array.
    ///
    /// Without per-path tracking this falls back to the index-wide flag.
    pub fn path_has_multikey_component(&self, path: &str) -> bool {
        let Some(paths) = &self.multikey_paths else {
            return self.multikey;
        };
        let mut end = 0;
        loop {
            let next = path[end..].find('.').map(|i| end + i);
            let prefix = match next {
                Some(dot) => &path[..dot],
                None => path,
            };
            if paths.contains(prefix) {
                return true;
            }
            match next {
                Some(dot) => end = dot + 1,
                None => return false,
            }
        }
    }
}
