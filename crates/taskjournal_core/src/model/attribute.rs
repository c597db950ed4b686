//! Typed task attributes and their storage codec.
//!
//! # Responsibility
//! - Model attribute values as a closed sum of four kinds.
//! - Encode values into the store's `(attr_type, attr_value)` text pair and
//!   decode them back without changing kind.
//!
//! # Invariants
//! - `decode(encode(v)) == v` and the decoded kind equals the encoded kind.
//! - Persisted kind tags are exactly `str`, `int`, `float` and `bool`.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Kind tag of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Text,
    Integer,
    Float,
    Boolean,
}

impl AttributeKind {
    /// Tag persisted in `task_attributes.attr_type`.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Text => "str",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Boolean => "bool",
        }
    }

    /// Parses a persisted kind tag.
    pub fn from_tag(tag: &str) -> Result<Self, AttributeError> {
        match tag {
            "str" => Ok(Self::Text),
            "int" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "bool" => Ok(Self::Boolean),
            other => Err(AttributeError::UnsupportedKind(other.to_string())),
        }
    }
}

impl Display for AttributeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// One attribute value attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::Text(_) => AttributeKind::Text,
            Self::Integer(_) => AttributeKind::Integer,
            Self::Float(_) => AttributeKind::Float,
            Self::Boolean(_) => AttributeKind::Boolean,
        }
    }

    /// Encodes the value as `(kind, payload)` for storage.
    ///
    /// Floats use the shortest representation that parses back to the same
    /// bits, so `3.0` is stored as `3` and still decodes as a float.
    pub fn encode(&self) -> (AttributeKind, String) {
        let payload = match self {
            Self::Text(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Boolean(value) => value.to_string(),
        };
        (self.kind(), payload)
    }

    /// Decodes a stored payload as the given kind.
    pub fn decode(kind: AttributeKind, payload: &str) -> Result<Self, AttributeError> {
        let invalid = || AttributeError::InvalidPayload {
            kind,
            payload: payload.to_string(),
        };
        match kind {
            AttributeKind::Text => Ok(Self::Text(payload.to_string())),
            AttributeKind::Integer => i64::from_str(payload.trim())
                .map(Self::Integer)
                .map_err(|_| invalid()),
            AttributeKind::Float => f64::from_str(payload.trim())
                .map(Self::Float)
                .map_err(|_| invalid()),
            AttributeKind::Boolean => match payload.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Self::Boolean(true)),
                "false" | "0" => Ok(Self::Boolean(false)),
                _ => Err(invalid()),
            },
        }
    }

    /// Decodes a stored `(attr_type, attr_value)` pair.
    pub fn decode_tagged(tag: &str, payload: &str) -> Result<Self, AttributeError> {
        Self::decode(AttributeKind::from_tag(tag)?, payload)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Accepts dynamically typed SQLite values, rejecting kinds without an
/// attribute counterpart.
impl TryFrom<Value> for AttributeValue {
    type Error = AttributeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(text) => Ok(Self::Text(text)),
            Value::Integer(number) => Ok(Self::Integer(number)),
            Value::Real(number) => Ok(Self::Float(number)),
            Value::Null => Err(AttributeError::UnsupportedKind("null".to_string())),
            Value::Blob(_) => Err(AttributeError::UnsupportedKind("blob".to_string())),
        }
    }
}

/// Codec failure for attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    /// Value kind or persisted tag outside `str|int|float|bool`.
    UnsupportedKind(String),
    /// Payload text cannot be read as its declared kind.
    InvalidPayload {
        kind: AttributeKind,
        payload: String,
    },
}

impl Display for AttributeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedKind(kind) => write!(
                f,
                "unsupported attribute kind `{kind}`; expected str|int|float|bool"
            ),
            Self::InvalidPayload { kind, payload } => {
                write!(f, "attribute payload `{payload}` is not a valid `{kind}`")
            }
        }
    }
}

impl Error for AttributeError {}
