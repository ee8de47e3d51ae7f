//! Resource data
//!
//! The attribute map handed to each lifecycle operation. It holds the
//! configuration on create/update and the stored state on read/delete.

use crate::hci::HciError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Resource identifier plus string attributes.
/// An empty value is treated the same as an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceData {
    id: String,
    attributes: BTreeMap<String, String>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data carrying only an identifier, as produced by a pass-through import
    pub fn with_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    /// Get an attribute, or "" when unset
    pub fn get(&self, key: &str) -> &str {
        self.attributes.get(key).map(String::as_str).unwrap_or("")
    }

    /// Get an attribute only when it is set to a non-empty value
    pub fn get_ok(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Set an attribute; setting "" removes it
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.attributes.remove(key);
        } else {
            self.attributes.insert(key.to_string(), value);
        }
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) {
        self.attributes.remove(key);
    }

    /// Drop the identifier and every attribute; the resource no longer exists
    pub fn clear(&mut self) {
        self.id.clear();
        self.attributes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.attributes.is_empty()
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build resource data from a JSON object.
    /// `id` becomes the identifier; scalar values are stored as strings and
    /// nulls are skipped.
    pub fn from_value(value: &Value) -> Result<Self, HciError> {
        let Some(object) = value.as_object() else {
            return Err(HciError::validation(
                "Resource data must be a map of attribute names to values",
            ));
        };

        let mut data = Self::new();
        for (key, value) in object {
            let value = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(HciError::validation(format!(
                        "Attribute {} must be a scalar value",
                        key
                    )));
                }
            };

            if key == "id" {
                data.id = value;
            } else {
                data.set(key, value);
            }
        }

        Ok(data)
    }

    /// Render as a JSON object with `id` first when set
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        if !self.id.is_empty() {
            object.insert("id".to_string(), Value::String(self.id.clone()));
        }
        for (key, value) in &self.attributes {
            object.insert(key.clone(), Value::String(value.clone()));
        }
        Value::Object(object)
    }
}
