//! WatchSet: read dependencies declared before queuing
//!
//! A watch records the effective version of a key at the moment it was
//! watched. At commit time every entry is compared against the store; any
//! difference aborts the transaction.
//!
//! Watching the same key twice keeps the first observation. A later watch
//! must not hide a change that happened after the first one.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use watchkv_core::{EffectiveVersion, Key, NamespaceId};

/// Watched keys with the effective version observed at watch time
///
/// Ordered by (namespace, key) so conflict reports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSet {
    entries: BTreeMap<(NamespaceId, Key), EffectiveVersion>,
}

impl WatchSet {
    /// Create an empty watch set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a watched key
    ///
    /// Returns false if the key was already watched; the original
    /// observation is kept.
    pub fn watch(&mut self, namespace: NamespaceId, key: Key, version: EffectiveVersion) -> bool {
        match self.entries.entry((namespace, key)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(version);
                true
            }
        }
    }

    /// Version observed for a watched key
    pub fn observed(&self, namespace: NamespaceId, key: &Key) -> Option<EffectiveVersion> {
        // BTreeMap lookup needs an owned tuple
        self.entries.get(&(namespace, key.clone())).copied()
    }

    /// Number of watched keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is watched
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every watch
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate (namespace, key, observed version) in order
    pub fn iter(&self) -> impl Iterator<Item = (NamespaceId, &Key, EffectiveVersion)> {
        self.entries
            .iter()
            .map(|((namespace, key), version)| (*namespace, key, *version))
    }
}
