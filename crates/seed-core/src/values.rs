//! Value representation for the model-seed framework.
//!
//! `Value` is what formatters produce and what storage backends accept. It is
//! a closed set of variants so storage and reporting can match on it without
//! runtime type inspection.

use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_yaml::Value as YamlValue;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// A single field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed integer (also used for primary keys and references)
    Int(i64),

    /// Unsigned integer beyond the signed range
    UInt(u64),

    /// Floating point
    Float(f64),

    /// Exact decimal
    Decimal(Decimal),

    /// String value
    String(String),

    /// Binary data, serialized as base64
    Bytes(#[serde(serialize_with = "serialize_bytes")] Vec<u8>),

    /// UUID value
    Uuid(Uuid),

    /// Date only
    Date(NaiveDate),

    /// Time only
    Time(NaiveTime),

    /// Date/time in UTC
    DateTime(DateTime<Utc>),

    /// Duration, serialized as fractional seconds
    Duration(#[serde(serialize_with = "serialize_duration")] Duration),

    /// JSON document
    Json(serde_json::Value),

    /// Array of values
    Array(Vec<Value>),
}

fn serialize_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the elements of an array value.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Truncate a string value to at most `max_length` characters.
    ///
    /// Non-string values are returned unchanged.
    pub fn truncated(self, max_length: usize) -> Self {
        match self {
            Self::String(s) if s.chars().count() > max_length => {
                Self::String(s.chars().take(max_length).collect())
            }
            other => other,
        }
    }

    /// Convert a YAML value to a `Value`.
    pub fn from_yaml(yaml: &YamlValue) -> Self {
        match yaml {
            YamlValue::Null => Self::Null,
            YamlValue::Bool(b) => Self::Bool(*b),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else if let Some(f) = n.as_f64() {
                    Self::Float(f)
                } else {
                    Self::String(n.to_string())
                }
            }
            YamlValue::String(s) => Self::String(s.clone()),
            YamlValue::Sequence(arr) => Self::Array(arr.iter().map(Self::from_yaml).collect()),
            YamlValue::Mapping(_) => match serde_json::to_value(yaml) {
                Ok(json) => Self::Json(json),
                Err(_) => Self::Null,
            },
            YamlValue::Tagged(tagged) => Self::from_yaml(&tagged.value),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::String(s) => f.write_str(s),
            Self::Bytes(b) => f.write_str(&base64::engine::general_purpose::STANDARD.encode(b)),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Self::Duration(d) => write!(f, "{}s", d.as_secs_f64()),
            Self::Json(json) => write!(f, "{json}"),
            Self::Array(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}
