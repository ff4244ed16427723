//! Global admin operations
//!
//! Whole-namespace and whole-store flushes executed immediately. Watchers
//! are invalidated through epochs rather than per-key version bumps, so a
//! flush costs one counter increment per namespace on the version side.
//!
//! The same effects are available inside a transaction by queuing
//! `Command::FlushNamespace` / `Command::FlushAll`.

use tracing::info;

use watchkv_core::NamespaceId;

use super::Database;

impl Database {
    /// Remove every key in `namespace` and bump its epoch
    ///
    /// Returns the number of live keys removed. Any transaction watching a
    /// key in this namespace will conflict at execute.
    pub fn flush_namespace(&self, namespace: NamespaceId) -> usize {
        let removed = self.store.flush_namespace(namespace);
        info!(target: "watchkv::admin", %namespace, removed, "Namespace flushed");
        removed
    }

    /// Remove every key in every namespace
    ///
    /// Bumps the store-wide flush epoch, which invalidates every watch in
    /// every namespace, including namespaces never written.
    pub fn flush_all(&self) -> usize {
        let removed = self.store.flush_all();
        info!(target: "watchkv::admin", removed, "All namespaces flushed");
        removed
    }
}
