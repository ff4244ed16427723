//! KeyValueStore: the shared ground-truth state
//!
//! This module implements the store using:
//! - `FxHashMap<NamespaceId, NamespaceStore>` for lazily created namespaces
//! - a store-wide flush epoch bumped by `FlushAll`
//! - one `parking_lot::RwLock` around the whole state
//!
//! # Design Notes
//!
//! - **Single lock**: reads share the lock and always see a consistent
//!   (value, version) pair. Direct writes and transaction commits take it
//!   exclusively, so a commit's check-then-apply is never interleaved.
//! - **Exposed guards**: the transaction manager calls [`KeyValueStore::write`]
//!   and drives [`StoreState`] itself while holding the guard.
//! - **Epochs over key rewrites**: flushes are O(namespace size) to drop the
//!   data, but watchers are invalidated by one counter bump.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHashMap;
use tracing::trace;

use watchkv_core::{
    Command, CommandResult, EffectiveVersion, Key, NamespaceId, Output, Result, Value,
    VersionedValue,
};

use crate::namespace::NamespaceStore;
use crate::stored_value::StoredEntry;

/// Every namespace plus the store-wide flush epoch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    namespaces: FxHashMap<NamespaceId, NamespaceStore>,
    flush_epoch: u64,
}

impl StoreState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Store-wide flush epoch
    #[inline]
    pub fn flush_epoch(&self) -> u64 {
        self.flush_epoch
    }

    /// A namespace, if it has ever been written
    #[inline]
    pub fn namespace(&self, namespace: NamespaceId) -> Option<&NamespaceStore> {
        self.namespaces.get(&namespace)
    }

    /// A namespace, created on first use
    pub fn namespace_mut(&mut self, namespace: NamespaceId) -> &mut NamespaceStore {
        self.namespaces.entry(namespace).or_default()
    }

    /// Move a namespace's key map out, leaving it empty with the same
    /// epoch and version marks
    pub(crate) fn detach_namespace(&mut self, namespace: NamespaceId) -> Option<NamespaceStore> {
        self.namespaces.get_mut(&namespace).map(NamespaceStore::detach)
    }

    /// Move every namespace's key map out
    pub(crate) fn detach_all(&mut self) -> Vec<(NamespaceId, NamespaceStore)> {
        self.namespaces
            .iter_mut()
            .map(|(namespace, ns)| (*namespace, ns.detach()))
            .collect()
    }

    pub(crate) fn restore_flush_epoch(&mut self, flush_epoch: u64) {
        self.flush_epoch = flush_epoch;
    }

    pub(crate) fn restore_namespace(
        &mut self,
        namespace: NamespaceId,
        before: Option<NamespaceStore>,
    ) {
        match before {
            Some(ns) => {
                self.namespaces.insert(namespace, ns);
            }
            None => {
                self.namespaces.remove(&namespace);
            }
        }
    }

    /// Effective version of a key: flush epoch, namespace epoch, key version
    ///
    /// Keys in a namespace that was never touched report epoch 0 and
    /// version 0. Absent keys report their namespace's retired-version floor.
    pub fn effective_version(&self, namespace: NamespaceId, key: &Key) -> EffectiveVersion {
        let (namespace_epoch, version) = self
            .namespaces
            .get(&namespace)
            .map(|ns| (ns.epoch(), ns.version_of(key)))
            .unwrap_or((0, 0));
        EffectiveVersion::new(self.flush_epoch, namespace_epoch, version)
    }

    /// Read a live key
    pub fn get(&self, namespace: NamespaceId, key: &Key) -> Option<VersionedValue> {
        self.namespaces
            .get(&namespace)
            .and_then(|ns| ns.get(key))
            .map(StoredEntry::to_versioned)
    }

    /// Create or overwrite a key, returning its new version
    pub fn set(&mut self, namespace: NamespaceId, key: Key, value: Value) -> u64 {
        self.namespace_mut(namespace).set(key, value)
    }

    /// Add `delta` to an integer key, returning the new value
    pub fn incr_by(&mut self, namespace: NamespaceId, key: &Key, delta: i64) -> Result<i64> {
        self.namespace_mut(namespace).incr_by(key, delta)
    }

    /// Subtract `delta` from an integer key, returning the new value
    pub fn decr_by(&mut self, namespace: NamespaceId, key: &Key, delta: i64) -> Result<i64> {
        self.namespace_mut(namespace).decr_by(key, delta)
    }

    /// Delete a live key
    pub fn delete(&mut self, namespace: NamespaceId, key: &Key) -> bool {
        match self.namespaces.get_mut(&namespace) {
            Some(ns) => ns.delete(key),
            None => false,
        }
    }

    /// Drop every key in one namespace and bump its epoch
    ///
    /// A namespace that was never written is created so that its epoch
    /// still moves; anyone watching an absent key there sees the flush.
    pub fn flush_namespace(&mut self, namespace: NamespaceId) -> usize {
        self.namespace_mut(namespace).flush()
    }

    /// Drop every key everywhere, bump the flush epoch and every namespace epoch
    pub fn flush_all(&mut self) -> usize {
        self.flush_epoch += 1;
        self.namespaces.values_mut().map(NamespaceStore::flush).sum()
    }

    /// Number of live keys in a namespace
    pub fn db_size(&self, namespace: NamespaceId) -> usize {
        self.namespaces
            .get(&namespace)
            .map(NamespaceStore::live_len)
            .unwrap_or(0)
    }

    /// Execute one command against `namespace`
    pub fn apply(&mut self, namespace: NamespaceId, command: &Command) -> CommandResult {
        match command {
            Command::Get { key } => Ok(Output::Maybe(self.get(namespace, key).map(|v| v.value))),
            Command::Set { key, value } => Ok(Output::Version(self.set(
                namespace,
                key.clone(),
                value.clone(),
            ))),
            Command::IncrBy { key, delta } => self.incr_by(namespace, key, *delta).map(Output::Int),
            Command::DecrBy { key, delta } => self.decr_by(namespace, key, *delta).map(Output::Int),
            Command::Delete { key } => Ok(Output::Bool(self.delete(namespace, key))),
            Command::DbSize => Ok(Output::Uint(self.db_size(namespace) as u64)),
            Command::FlushNamespace => {
                self.flush_namespace(namespace);
                Ok(Output::Unit)
            }
            Command::FlushAll => {
                self.flush_all();
                Ok(Output::Unit)
            }
        }
    }
}

/// Thread-safe shared store
///
/// Owned explicitly and shared through `Arc`; there is no process-wide
/// instance.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    state: RwLock<StoreState>,
}

impl KeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared access to the whole state
    pub fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read()
    }

    /// Exclusive access to the whole state
    pub fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write()
    }

    /// Read a live key
    pub fn get(&self, namespace: NamespaceId, key: &Key) -> Option<VersionedValue> {
        self.state.read().get(namespace, key)
    }

    /// Create or overwrite a key, returning its new version
    pub fn set(&self, namespace: NamespaceId, key: Key, value: Value) -> u64 {
        let version = self.state.write().set(namespace, key, value);
        trace!(target: "watchkv::store", %namespace, version, "set");
        version
    }

    /// Add `delta` to an integer key, returning the new value
    pub fn incr_by(&self, namespace: NamespaceId, key: &Key, delta: i64) -> Result<i64> {
        let result = self.state.write().incr_by(namespace, key, delta);
        trace!(target: "watchkv::store", %namespace, delta, ok = result.is_ok(), "incr_by");
        result
    }

    /// Subtract `delta` from an integer key, returning the new value
    pub fn decr_by(&self, namespace: NamespaceId, key: &Key, delta: i64) -> Result<i64> {
        let result = self.state.write().decr_by(namespace, key, delta);
        trace!(target: "watchkv::store", %namespace, delta, ok = result.is_ok(), "decr_by");
        result
    }

    /// Delete a live key
    pub fn delete(&self, namespace: NamespaceId, key: &Key) -> bool {
        let deleted = self.state.write().delete(namespace, key);
        trace!(target: "watchkv::store", %namespace, deleted, "delete");
        deleted
    }

    /// Drop every key in one namespace, returning how many live keys went
    pub fn flush_namespace(&self, namespace: NamespaceId) -> usize {
        self.state.write().flush_namespace(namespace)
    }

    /// Drop every key in every namespace, returning how many live keys went
    pub fn flush_all(&self) -> usize {
        self.state.write().flush_all()
    }

    /// Effective version of a key
    pub fn effective_version(&self, namespace: NamespaceId, key: &Key) -> EffectiveVersion {
        self.state.read().effective_version(namespace, key)
    }

    /// Number of live keys in a namespace
    pub fn db_size(&self, namespace: NamespaceId) -> usize {
        self.state.read().db_size(namespace)
    }

    /// Execute one command atomically
    pub fn apply(&self, namespace: NamespaceId, command: &Command) -> CommandResult {
        if command.is_write() {
            self.state.write().apply(namespace, command)
        } else {
            // Reads never mutate, a shared guard is enough
            match command {
                Command::Get { key } => Ok(Output::Maybe(self.get(namespace, key).map(|v| v.value))),
                _ => Ok(Output::Uint(self.db_size(namespace) as u64)),
            }
        }
    }
}
