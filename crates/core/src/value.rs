//! Value type
//!
//! The engine is value-type agnostic: a [`Value`] is an opaque byte
//! sequence. Arithmetic commands parse and format values as base-10
//! signed 64-bit integers and fail with `NotAnInteger` otherwise.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque byte value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Value(Vec<u8>);

impl Value {
    /// Create a value from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Value(bytes.into())
    }

    /// Encode an integer the way arithmetic commands store it
    pub fn from_i64(n: i64) -> Self {
        Value(n.to_string().into_bytes())
    }

    /// Raw bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse as a base-10 signed integer
    ///
    /// Accepts an optional leading `-` and ASCII digits only: no surrounding
    /// whitespace, no `+` sign, no leading zeros other than `0` itself.
    /// Returns `None` when the bytes are not a canonical integer or the
    /// number does not fit in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        let s = std::str::from_utf8(&self.0).ok()?;
        let digits = s.strip_prefix('-').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return None;
        }
        if s == "-0" {
            return None;
        }
        s.parse().ok()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::from_i64(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}
