//! Version types used for watch-based conflict detection
//!
//! Every mutation of a key bumps that key's version counter by one. Flush
//! operations do not touch per-key counters; instead they bump an epoch.
//! The [`EffectiveVersion`] combines all three counters so that a single
//! equality check detects any change a watcher must observe.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

/// A key's version combined with the epochs that cover it
///
/// - `flush_epoch`: store-wide, bumped by `FlushAll`
/// - `namespace_epoch`: bumped by `FlushNamespace` (and by `FlushAll` for every
///   existing namespace)
/// - `version`: per-key counter, 0 when the key has never been written since
///   the last flush
///
/// Ordering is lexicographic over the three fields, so a later state always
/// compares greater than an earlier one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct EffectiveVersion {
    /// Store-wide flush epoch
    pub flush_epoch: u64,
    /// Namespace flush epoch
    pub namespace_epoch: u64,
    /// Per-key mutation counter
    pub version: u64,
}

impl EffectiveVersion {
    /// Effective version of a key that has never been written in a fresh store
    pub const UNSET: EffectiveVersion = EffectiveVersion {
        flush_epoch: 0,
        namespace_epoch: 0,
        version: 0,
    };

    /// Combine the three counters
    pub const fn new(flush_epoch: u64, namespace_epoch: u64, version: u64) -> Self {
        Self {
            flush_epoch,
            namespace_epoch,
            version,
        }
    }
}

impl fmt::Display for EffectiveVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.flush_epoch, self.namespace_epoch, self.version
        )
    }
}

/// A live value together with its per-key version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedValue {
    /// The stored value
    pub value: Value,
    /// Per-key version (starts at 1 for the first write)
    pub version: u64,
}

impl VersionedValue {
    /// Create a new versioned value
    pub fn new(value: Value, version: u64) -> Self {
        Self { value, version }
    }
}
