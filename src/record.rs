// Generic record trait for any catalog entity

use crate::error::{CatalogError, CatalogResult};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;

/// Core trait that any catalog record must implement
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Unique identifier for this record
    fn id(&self) -> &str;

    /// Replace the identifier, used when the store assigns a fresh one
    fn set_id(&mut self, id: String);

    /// Collection name for this record type (e.g., "documents", "tasks")
    fn collection_name() -> &'static str
    where
        Self: Sized;

    /// Human readable label matched by free-text search
    fn primary_text(&self) -> &str;

    /// Extra labels matched by free-text search (e.g., the client a document belongs to)
    fn search_labels(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Named field values available for equality filters and aggregation
    /// Return empty HashMap if no fields should be exposed
    fn indexed_fields(&self) -> HashMap<String, IndexValue> {
        HashMap::new()
    }

    /// Read a single named field
    fn field(&self, name: &str) -> Option<IndexValue> {
        self.indexed_fields().remove(name)
    }

    /// Replace a single named field
    ///
    /// Implementations must leave the record unchanged when returning an error.
    fn set_field(&mut self, name: &str, _value: &IndexValue) -> CatalogResult<()> {
        Err(CatalogError::invalid_field(name, "field is not writable"))
    }
}

/// Value types exposed by records for filtering and aggregation
#[derive(Debug, Clone, PartialEq)]
pub enum IndexValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl IndexValue {
    /// Numeric view used by sums; strings and booleans have none
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            IndexValue::Int(i) => Some(*i as f64),
            IndexValue::Float(f) => Some(*f),
            IndexValue::String(_) | IndexValue::Bool(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            IndexValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            IndexValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            IndexValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            IndexValue::String(_) => "string",
            IndexValue::Int(_) => "integer",
            IndexValue::Float(_) => "float",
            IndexValue::Bool(_) => "boolean",
        }
    }
}

impl std::fmt::Display for IndexValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexValue::String(s) => write!(f, "{}", s),
            IndexValue::Int(i) => write!(f, "{}", i),
            IndexValue::Float(x) => write!(f, "{}", x),
            IndexValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for IndexValue {
    fn from(value: &str) -> Self {
        IndexValue::String(value.to_string())
    }
}

impl From<String> for IndexValue {
    fn from(value: String) -> Self {
        IndexValue::String(value)
    }
}

impl From<i64> for IndexValue {
    fn from(value: i64) -> Self {
        IndexValue::Int(value)
    }
}

impl From<f64> for IndexValue {
    fn from(value: f64) -> Self {
        IndexValue::Float(value)
    }
}

impl From<bool> for IndexValue {
    fn from(value: bool) -> Self {
        IndexValue::Bool(value)
    }
}

/// Fetch a string payload for `field` or fail with a typed error
pub(crate) fn expect_str<'a>(field: &str, value: &'a IndexValue) -> CatalogResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| CatalogError::invalid_field(field, format!("expected string, got {}", value.type_name())))
}
