//! Storage layer for watchkv
//!
//! This crate implements the in-memory store with:
//! - KeyValueStore: every namespace behind one `parking_lot::RwLock`
//! - NamespaceStore: FxHashMap of live keys plus a flush epoch and version marks
//! - StoredEntry: a live value with its per-key version counter
//! - UndoLog: before-images for rolling back a partially applied queue
//!
//! There is no persistence; the store lives for the process lifetime.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod namespace;
pub mod store;
pub mod stored_value;
pub mod undo;

pub use namespace::NamespaceStore;
pub use store::{KeyValueStore, StoreState};
pub use stored_value::StoredEntry;
pub use undo::UndoLog;
