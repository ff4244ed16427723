//! Core identifiers: namespaces and keys
//!
//! - [`NamespaceId`]: index of an isolated keyspace (a "database" in Redis terms)
//! - [`Key`]: opaque byte identifier, unique within a namespace

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a logical namespace
///
/// Each namespace is an isolated keyspace selected at session scope.
/// Operations never cross namespaces implicitly; only `FlushAll` touches
/// every namespace at once.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct NamespaceId(pub u32);

impl NamespaceId {
    /// The namespace sessions start in
    pub const DEFAULT: NamespaceId = NamespaceId(0);

    /// Create a namespace id from its index
    pub const fn new(index: u32) -> Self {
        NamespaceId(index)
    }

    /// Raw namespace index
    #[inline]
    pub const fn index(&self) -> u32 {
        self.0
    }
}

impl From<u32> for NamespaceId {
    fn from(index: u32) -> Self {
        NamespaceId(index)
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns{}", self.0)
    }
}

/// Opaque key identifier
///
/// Keys are byte strings; the engine never interprets them. Display renders
/// the bytes lossily as UTF-8, which is what error messages and logs use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key(Vec<u8>);

impl Key {
    /// Create a key from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Key(bytes.into())
    }

    /// Raw key bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key rendered as (lossy) UTF-8
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key(s.as_bytes().to_vec())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key(s.into_bytes())
    }
}

impl From<&[u8]> for Key {
    fn from(b: &[u8]) -> Self {
        Key(b.to_vec())
    }
}

impl From<Vec<u8>> for Key {
    fn from(b: Vec<u8>) -> Self {
        Key(b)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}
