//! Structured key-value fields attached to log events
//!
//! This module provides:
//! - `FieldValue`: an open value type for field contents
//! - `FieldMap`: a sorted, string-keyed map of values
//! - `Fields`: the two field namespaces of an event (custom and global)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Prefix applied to global field keys when both namespaces are flattened
pub const GLOBAL_FIELD_PREFIX: &str = "#";

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    /// Arbitrary structured data (arrays, objects, nested values)
    Structured(serde_json::Value),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
            FieldValue::Structured(v) => write!(f, "{}", v),
        }
    }
}

impl FieldValue {
    /// Convert arbitrary serializable data into a field value.
    ///
    /// Data that cannot be represented as JSON is kept as a string describing
    /// the failure, so the rest of the record still gets written.
    pub fn serialized<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => FieldValue::from(json),
            Err(e) => FieldValue::String(format!("!unserializable: {}", e)),
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Structured(v) => v.clone(),
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => match n.as_f64() {
                    Some(f) if n.is_f64() => FieldValue::Float(f),
                    _ => FieldValue::Structured(serde_json::Value::Number(n)),
                },
            },
            other => FieldValue::Structured(other),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<usize> for FieldValue {
    fn from(i: usize) -> Self {
        i64::try_from(i).map_or_else(|_| FieldValue::serialized(&i), FieldValue::Int)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// String-keyed field map with a stable (sorted) iteration order
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Build a `FieldMap` from key/value pairs
pub fn field_map<K, V, I>(pairs: I) -> FieldMap
where
    K: Into<String>,
    V: Into<FieldValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// The two field namespaces of an event
///
/// `custom` holds fields supplied at the call site; `global` holds fields
/// injected by module or environment configuration (file/line, injectors,
/// filters). Both maps are owned by the event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    pub custom: FieldMap,
    pub global: FieldMap,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from call-site fields with an empty global namespace
    pub fn from_custom(custom: FieldMap) -> Self {
        Self {
            custom,
            global: FieldMap::new(),
        }
    }

    pub fn with_custom<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.custom.insert(key.into(), value.into());
        self
    }

    pub fn with_global<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.global.insert(key.into(), value.into());
        self
    }

    pub fn insert_custom<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.custom.insert(key.into(), value.into());
    }

    pub fn insert_global<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.global.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.custom.is_empty() && self.global.is_empty()
    }

    /// Flatten both namespaces into one JSON object.
    ///
    /// Global keys are prefixed with `#`; global keys listed in `excluding`
    /// are skipped. Neither source map is touched.
    pub fn to_map(&self, excluding: &[&str]) -> serde_json::Map<String, serde_json::Value> {
        let mut merged: serde_json::Map<String, serde_json::Value> = self
            .custom
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json_value()))
            .collect();

        for (key, value) in &self.global {
            if excluding.contains(&key.as_str()) {
                continue;
            }
            merged.insert(
                format!("{}{}", GLOBAL_FIELD_PREFIX, key),
                value.to_json_value(),
            );
        }

        merged
    }

    /// JSON encoding of `to_map(&[])`
    pub fn serialize(&self) -> String {
        serde_json::Value::Object(self.to_map(&[])).to_string()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
