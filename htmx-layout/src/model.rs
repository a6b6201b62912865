//! Per-request data handed to templates.

use std::collections::BTreeMap;

use minijinja::Value;
use serde::Serialize;

use crate::error::{Error, Result};

/// String-keyed values exposed to templates for a single render.
///
/// A model is built fresh by the handler, may be adjusted by a
/// [`ModelDecorator`](crate::decorator::ModelDecorator), and receives the
/// rendered content under the configured key before the layout runs.
///
/// # Example
///
/// ```rust
/// use htmx_layout::Model;
///
/// let mut model = Model::new().with("Name", "Jerry");
/// model.insert("Visits", 3);
///
/// assert_eq!(model.get("Name").and_then(|v| v.as_str()), Some("Jerry"));
/// assert_eq!(model.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Model {
    values: BTreeMap<String, Value>,
}

impl Model {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from any value that serializes to a map, such as a
    /// struct with named fields.
    pub fn from_serialize<T: Serialize + ?Sized>(data: &T) -> Result<Self> {
        match serde_json::to_value(data)? {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(key, value)| (key, Value::from_serialize(&value)))
                .collect()),
            serde_json::Value::Null => Ok(Self::new()),
            other => Err(Error::Model(format!(
                "expected a map or struct, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Insert a value, returning the previous value under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Insert any serializable value.
    pub fn insert_serialized<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Option<Value> {
        self.values.insert(key.into(), Value::from_serialize(value))
    }

    /// Insert already-rendered HTML that auto-escaping must leave untouched.
    pub fn insert_raw_html(&mut self, key: impl Into<String>, html: impl Into<String>) -> Option<Value> {
        self.values
            .insert(key.into(), Value::from_safe_string(html.into()))
    }

    /// Builder form of [`Model::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Check whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the model has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Template context for this model.
    pub fn to_value(&self) -> Value {
        Value::from(self.values.clone())
    }
}

impl<K, V> FromIterator<(K, V)> for Model
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
