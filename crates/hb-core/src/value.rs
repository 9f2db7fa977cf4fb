//! Characteristic values

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Format;

/// The value of a characteristic
///
/// Serialized as a bare JSON value (`true`, `"Medion"`), which is how HAP
/// carries values on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    String(String),
}

impl CharacteristicValue {
    /// Interpret the value as a boolean
    ///
    /// Controllers may send `0`/`1` for bool characteristics, so the string
    /// forms `"0"`, `"1"`, `"true"` and `"false"` are accepted too.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CharacteristicValue::Bool(b) => Some(*b),
            CharacteristicValue::String(s) => match s.as_str() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CharacteristicValue::String(s) => Some(s),
            CharacteristicValue::Bool(_) => None,
        }
    }

    /// Coerce this value to the given format, if possible
    pub fn coerce(self, format: Format) -> Option<Self> {
        match format {
            Format::Bool => self.as_bool().map(CharacteristicValue::Bool),
            Format::String => match self {
                CharacteristicValue::String(s) => Some(CharacteristicValue::String(s)),
                CharacteristicValue::Bool(_) => None,
            },
        }
    }

    /// Build a value from a JSON value as sent by a controller
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(CharacteristicValue::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(0) => Some(CharacteristicValue::Bool(false)),
                Some(1) => Some(CharacteristicValue::Bool(true)),
                _ => None,
            },
            serde_json::Value::String(s) => Some(CharacteristicValue::String(s.clone())),
            _ => None,
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        CharacteristicValue::Bool(value)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        CharacteristicValue::String(value.to_string())
    }
}

impl From<String> for CharacteristicValue {
    fn from(value: String) -> Self {
        CharacteristicValue::String(value)
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacteristicValue::Bool(b) => write!(f, "{}", b),
            CharacteristicValue::String(s) => f.write_str(s),
        }
    }
}
