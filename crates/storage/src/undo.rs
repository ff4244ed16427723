//! Undo log for rolling back a partially applied command queue
//!
//! Before each mutating command is applied the log captures what it needs
//! to restore it:
//! - key commands: the key's previous entry and its namespace's version marks
//! - `FlushNamespace`: the namespace's key map, moved out rather than copied
//! - `FlushAll`: the flush epoch and every namespace's key map, moved out
//!
//! Moving the maps keeps recording O(1) per namespace; the flush that
//! follows then runs over emptied namespaces that carry the same epochs and
//! marks. Rollback replays the images in reverse order. The caller must hold
//! the store write lock for the whole apply-then-rollback sequence so that
//! no reader ever sees the discarded mutations.

use watchkv_core::{Command, Key, NamespaceId};

use crate::namespace::{NamespaceStore, VersionMarks};
use crate::stored_value::StoredEntry;
use crate::store::StoreState;

/// One before-image
#[derive(Debug)]
enum UndoEntry {
    Key {
        namespace: NamespaceId,
        key: Key,
        before: Option<StoredEntry>,
        marks: VersionMarks,
    },
    Namespace {
        namespace: NamespaceId,
        before: Option<NamespaceStore>,
    },
    Store {
        flush_epoch: u64,
        namespaces: Vec<(NamespaceId, NamespaceStore)>,
    },
}

/// Ordered before-images of the commands applied so far
#[derive(Debug, Default)]
pub struct UndoLog {
    entries: Vec<UndoEntry>,
}

impl UndoLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded before-images
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capture what `command` is about to overwrite
    ///
    /// Read-only commands record nothing. For flushes the key maps are moved
    /// into the log, so `command` must be applied right after this call.
    pub fn record(&mut self, state: &mut StoreState, namespace: NamespaceId, command: &Command) {
        let entry = match command {
            Command::Get { .. } | Command::DbSize => return,
            Command::Set { key, .. }
            | Command::IncrBy { key, .. }
            | Command::DecrBy { key, .. }
            | Command::Delete { key } => {
                let ns = state.namespace(namespace);
                UndoEntry::Key {
                    namespace,
                    key: key.clone(),
                    before: ns.and_then(|ns| ns.get(key)).cloned(),
                    marks: ns.map(NamespaceStore::marks).unwrap_or_default(),
                }
            }
            Command::FlushNamespace => UndoEntry::Namespace {
                namespace,
                before: state.detach_namespace(namespace),
            },
            Command::FlushAll => UndoEntry::Store {
                flush_epoch: state.flush_epoch(),
                namespaces: state.detach_all(),
            },
        };
        self.entries.push(entry);
    }

    /// Restore `state` to how it was before the first recorded command
    pub fn rollback(self, state: &mut StoreState) {
        for entry in self.entries.into_iter().rev() {
            match entry {
                UndoEntry::Key {
                    namespace,
                    key,
                    before,
                    marks,
                } => state
                    .namespace_mut(namespace)
                    .restore_entry(key, before, marks),
                UndoEntry::Namespace { namespace, before } => {
                    state.restore_namespace(namespace, before)
                }
                UndoEntry::Store {
                    flush_epoch,
                    namespaces,
                } => {
                    state.restore_flush_epoch(flush_epoch);
                    for (namespace, before) in namespaces {
                        state.restore_namespace(namespace, Some(before));
                    }
                }
            }
        }
    }
}
