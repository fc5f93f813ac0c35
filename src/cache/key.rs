use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Composite cache key: resource name followed by ids and filter objects.
///
/// Equality and hashing go through the canonical JSON rendering, so two keys
/// built from objects with the same fields in a different order are the same
/// key. `null` object fields are dropped when a filter is pushed, which makes
/// an unset filter field and an absent one equivalent.
#[derive(Clone)]
pub struct QueryKey {
    parts: Vec<Value>,
    canonical: String,
}

impl QueryKey {
    pub fn new(root: &str) -> Self {
        Self::from_parts(vec![Value::String(root.to_string())])
    }

    pub fn from_parts(parts: Vec<Value>) -> Self {
        let canonical = Value::Array(parts.clone()).to_string();
        Self { parts, canonical }
    }

    /// Appends a segment (resource name or id).
    pub fn push(self, segment: impl Into<String>) -> Self {
        self.push_value(Value::String(segment.into()))
    }

    /// Appends a filter object.
    pub fn push_filter(self, filter: Value) -> Self {
        self.push_value(compact(filter))
    }

    fn push_value(self, value: Value) -> Self {
        let mut parts = self.parts;
        parts.push(value);
        Self::from_parts(parts)
    }

    pub fn parts(&self) -> &[Value] {
        &self.parts
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        prefix.parts.len() <= self.parts.len()
            && self.parts.iter().zip(&prefix.parts).all(|(a, b)| a == b)
    }
}

fn compact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, compact(v)))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

impl PartialEq for QueryKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for QueryKey {}

impl Hash for QueryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl fmt::Debug for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueryKey({})", self.canonical)
    }
}

impl Serialize for QueryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.parts.serialize(serializer)
    }
}
