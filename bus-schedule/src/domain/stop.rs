//! Stop records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A boarding point.
///
/// Nothing in the registry creates stops; the mapping exists so that data
/// files carrying stop details load and save without loss. The record is
/// kept exactly as it appears in the file, whatever its shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stop(Value);

impl Stop {
    /// Wrap a stop record.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The record as stored.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// The stop's name: the record itself if it is a string, otherwise its
    /// `name` field.
    pub fn name(&self) -> Option<&str> {
        match &self.0 {
            Value::String(name) => Some(name),
            Value::Object(fields) => fields.get("name").and_then(Value::as_str),
            _ => None,
        }
    }
}
