//! Field access on opaque table rows.

use serde_json::{Map, Value};

use super::Scalar;

/// Read access to the fields of a table row.
///
/// The controller never inspects rows beyond this trait: headers project
/// display values through [`Record::value_at`] and selection derives row
/// identity through [`Record::key_value`].
///
/// Implemented for JSON values and maps. Application structs can implement it
/// directly, or be converted with `serde_json::to_value` by the fetcher.
pub trait Record {
    /// Returns the value at a normalized access path.
    ///
    /// An empty path returns `None`.
    fn value_at(&self, path: &[String]) -> Option<Value>;

    /// Returns the scalar stored under a top-level field, used as row identity.
    fn key_value(&self, key: &str) -> Option<Scalar> {
        self.value_at(&[key.to_string()])
            .as_ref()
            .and_then(Scalar::from_json)
    }
}

/// Walks a JSON value along `path`: object members by name, array elements by index.
pub fn lookup<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

impl Record for Value {
    fn value_at(&self, path: &[String]) -> Option<Value> {
        if path.is_empty() {
            return None;
        }
        lookup(self, path).cloned()
    }
}

impl Record for Map<String, Value> {
    fn value_at(&self, path: &[String]) -> Option<Value> {
        let (first, rest) = path.split_first()?;
        lookup(self.get(first)?, rest).cloned()
    }
}
