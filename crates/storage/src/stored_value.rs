//! Storage-layer entry
//!
//! Only live keys have an entry. A deleted key's last version is folded into
//! its namespace's retired-version floor (see `namespace.rs`), so the map
//! never keeps anything for keys that are gone.

use watchkv_core::{Value, VersionedValue};

/// A live value and its per-key version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    value: Value,
    version: u64,
}

impl StoredEntry {
    /// Create an entry
    pub fn new(value: Value, version: u64) -> Self {
        StoredEntry { value, version }
    }

    /// Get the value
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Get the version
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Contract view of the entry
    pub fn to_versioned(&self) -> VersionedValue {
        VersionedValue::new(self.value.clone(), self.version)
    }
}
