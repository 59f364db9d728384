//! LeafValue - terminal payload of leaves and leaf-list entries
//!
//! Leaf values are totally ordered so they can participate in child identifiers
//! (list keys, leaf-list entries). There is no floating point variant; decimal
//! values are carried as strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Payload of a terminal node.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum LeafValue {
    /// Presence-only value (YANG `empty`).
    Empty,
    /// Boolean value.
    Boolean(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// String value.
    String(String),
}

impl LeafValue {
    /// Creates a signed integer value.
    pub fn int(value: i64) -> Self {
        LeafValue::Int(value)
    }

    /// Creates an unsigned integer value.
    pub fn uint(value: u64) -> Self {
        LeafValue::Uint(value)
    }

    /// Creates a string value.
    pub fn string(value: impl Into<String>) -> Self {
        LeafValue::String(value.into())
    }

    /// Returns the runtime type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            LeafValue::Empty => "empty",
            LeafValue::Boolean(_) => "boolean",
            LeafValue::Int(_) => "int",
            LeafValue::Uint(_) => "uint",
            LeafValue::String(_) => "string",
        }
    }
}

impl fmt::Display for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafValue::Empty => write!(f, "[empty]"),
            LeafValue::Boolean(b) => write!(f, "{}", b),
            LeafValue::Int(i) => write!(f, "{}", i),
            LeafValue::Uint(u) => write!(f, "{}", u),
            LeafValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for LeafValue {
    fn from(value: bool) -> Self {
        LeafValue::Boolean(value)
    }
}

impl From<i64> for LeafValue {
    fn from(value: i64) -> Self {
        LeafValue::Int(value)
    }
}

impl From<u64> for LeafValue {
    fn from(value: u64) -> Self {
        LeafValue::Uint(value)
    }
}

impl From<&str> for LeafValue {
    fn from(value: &str) -> Self {
        LeafValue::String(value.to_string())
    }
}

impl From<String> for LeafValue {
    fn from(value: String) -> Self {
        LeafValue::String(value)
    }
}
