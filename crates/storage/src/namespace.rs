//! NamespaceStore: one isolated keyspace
//!
//! A namespace owns its key map, an epoch counter and two version marks:
//! - `floor`: the highest version any key that is no longer in the map ever
//!   had. Absent keys report it as their version, and a key created from
//!   absence starts right above it.
//! - `high_water`: the highest version handed out in this namespace.
//!
//! Deleting a key removes it from the map and lifts `floor` past its last
//! version; flushing clears the map, lifts `floor` to `high_water` and bumps
//! the epoch. A key's version therefore never repeats, and nothing is kept
//! for keys that are gone. Watchers of absent keys are invalidated by any
//! delete in the namespace, which errs on the side of a conflict.

use rustc_hash::FxHashMap;

use watchkv_core::{Error, Key, Result, Value};

use crate::stored_value::StoredEntry;

/// Version counters of a namespace, captured for rollback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct VersionMarks {
    floor: u64,
    high_water: u64,
}

/// One logical keyspace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceStore {
    data: FxHashMap<Key, StoredEntry>,
    epoch: u64,
    marks: VersionMarks,
}

impl NamespaceStore {
    /// Create an empty namespace at epoch 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Current flush epoch
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Live entry for a key
    #[inline]
    pub fn get(&self, key: &Key) -> Option<&StoredEntry> {
        self.data.get(key)
    }

    /// Per-key version; absent keys report the retired-version floor
    pub fn version_of(&self, key: &Key) -> u64 {
        self.data
            .get(key)
            .map(StoredEntry::version)
            .unwrap_or(self.marks.floor)
    }

    /// Number of live keys
    #[inline]
    pub fn live_len(&self) -> usize {
        self.data.len()
    }

    /// Create or overwrite a key, returning its new version
    pub fn set(&mut self, key: Key, value: Value) -> u64 {
        let version = self.version_of(&key) + 1;
        self.marks.high_water = self.marks.high_water.max(version);
        self.data.insert(key, StoredEntry::new(value, version));
        version
    }

    /// Add `delta` to an integer value, returning the new value
    ///
    /// Absent keys seed at 0. On error nothing is written.
    pub fn incr_by(&mut self, key: &Key, delta: i64) -> Result<i64> {
        let current = match self.get(key) {
            Some(entry) => entry.value().as_i64().ok_or_else(|| Error::NotAnInteger {
                key: key.to_string_lossy(),
            })?,
            None => 0,
        };
        let next = current.checked_add(delta).ok_or_else(|| Error::Overflow {
            key: key.to_string_lossy(),
        })?;
        self.set(key.clone(), Value::from_i64(next));
        Ok(next)
    }

    /// Subtract `delta` from an integer value, returning the new value
    pub fn decr_by(&mut self, key: &Key, delta: i64) -> Result<i64> {
        let negated = delta.checked_neg().ok_or_else(|| Error::Overflow {
            key: key.to_string_lossy(),
        })?;
        self.incr_by(key, negated)
    }

    /// Delete a live key
    ///
    /// The deletion counts as one more mutation: the key's version after the
    /// delete is its last version plus one. Returns false (and bumps nothing)
    /// when the key is absent.
    pub fn delete(&mut self, key: &Key) -> bool {
        match self.data.remove(key) {
            Some(entry) => {
                let retired = entry.version() + 1;
                self.marks.floor = self.marks.floor.max(retired);
                self.marks.high_water = self.marks.high_water.max(retired);
                true
            }
            None => false,
        }
    }

    /// Drop every entry and bump the epoch, returning the live keys removed
    pub fn flush(&mut self) -> usize {
        let removed = self.data.len();
        self.data.clear();
        self.marks.floor = self.marks.high_water;
        self.epoch += 1;
        removed
    }

    /// Move the key map out, leaving an empty namespace with the same
    /// epoch and marks
    pub(crate) fn detach(&mut self) -> NamespaceStore {
        let emptied = NamespaceStore {
            data: FxHashMap::default(),
            epoch: self.epoch,
            marks: self.marks,
        };
        std::mem::replace(self, emptied)
    }

    pub(crate) fn marks(&self) -> VersionMarks {
        self.marks
    }

    /// Put back an entry's before-image and the marks that went with it
    pub(crate) fn restore_entry(
        &mut self,
        key: Key,
        before: Option<StoredEntry>,
        marks: VersionMarks,
    ) {
        match before {
            Some(entry) => {
                self.data.insert(key, entry);
            }
            None => {
                self.data.remove(&key);
            }
        }
        self.marks = marks;
    }
}
