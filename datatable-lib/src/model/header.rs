//! Column headers and access path normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Record;
use crate::error::TableError;

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// An access path as configured: a dot-path or a list of segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccessPath {
    /// Dot separated path, e.g. `"owner.name"`.
    Dotted(String),
    /// Explicit segments, e.g. `["owner", "name"]`.
    Segments(Vec<String>),
}

impl AccessPath {
    /// Collapses both forms into an ordered list of non-empty keys.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Self::Dotted(path) => path
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Segments(segments) => segments
                .iter()
                .flat_map(|s| s.split('.'))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl From<&str> for AccessPath {
    fn from(path: &str) -> Self {
        Self::Dotted(path.to_string())
    }
}

impl From<String> for AccessPath {
    fn from(path: String) -> Self {
        Self::Dotted(path)
    }
}

impl From<Vec<String>> for AccessPath {
    fn from(segments: Vec<String>) -> Self {
        Self::Segments(segments)
    }
}

impl From<&[&str]> for AccessPath {
    fn from(segments: &[&str]) -> Self {
        Self::Segments(segments.iter().map(|s| s.to_string()).collect())
    }
}

/// Header configuration before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderSpec {
    /// Display name only; the value is read from the field named by the header key.
    Name(String),
    /// Full column configuration.
    Full {
        name: String,
        access: AccessPath,
        #[serde(default)]
        sortable: bool,
        #[serde(default)]
        width: Option<String>,
        #[serde(default)]
        align: Alignment,
    },
}

impl HeaderSpec {
    /// Full spec with a custom access path.
    pub fn new(name: impl Into<String>, access: impl Into<AccessPath>) -> Self {
        Self::Full {
            name: name.into(),
            access: access.into(),
            sortable: false,
            width: None,
            align: Alignment::Left,
        }
    }
}

impl From<&str> for HeaderSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// A normalized column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header key, unique within a table.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Non-empty access path into a row.
    pub access: Vec<String>,
    pub sortable: bool,
    /// Width class for the column.
    pub width: Option<String>,
    pub align: Alignment,
}

impl Header {
    /// Normalizes a header spec registered under `key`.
    pub fn from_spec(key: impl Into<String>, spec: HeaderSpec) -> Result<Self, TableError> {
        let key = key.into();
        let header = match spec {
            HeaderSpec::Name(name) => Self {
                access: AccessPath::Dotted(key.clone()).normalize(),
                key,
                name,
                sortable: false,
                width: None,
                align: Alignment::Left,
            },
            HeaderSpec::Full {
                name,
                access,
                sortable,
                width,
                align,
            } => Self {
                access: access.normalize(),
                key,
                name,
                sortable,
                width,
                align,
            },
        };
        if header.access.is_empty() {
            return Err(TableError::InvalidHeader(header.key));
        }
        Ok(header)
    }

    /// Projects this column's value out of a row.
    pub fn project<R: Record + ?Sized>(&self, row: &R) -> Option<Value> {
        row.value_at(&self.access)
    }

    /// Projects this column's value and renders it for display.
    ///
    /// Strings are shown without quotes; missing and null values render empty.
    pub fn display<R: Record + ?Sized>(&self, row: &R) -> String {
        match self.project(row) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
        }
    }
}
