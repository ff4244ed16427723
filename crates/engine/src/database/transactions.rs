//! Transaction API
//!
//! Thin wrappers that bind the coordinator to this database's store. The
//! caller owns each `TransactionContext` exclusively; the executor's
//! `Session` is the usual owner and enforces one active transaction per
//! session.

use watchkv_concurrency::{TransactionContext, WatchOutcome};
use watchkv_core::{Command, CommandResult, Key, NamespaceId, Result};

use super::Database;

impl Database {
    /// Begin a transaction in the `Idle` state
    pub fn begin_transaction(&self) -> TransactionContext {
        self.coordinator.start_transaction()
    }

    /// Watch a key at its current effective version
    ///
    /// Has no effect once the transaction is queuing.
    pub fn watch(
        &self,
        txn: &mut TransactionContext,
        namespace: NamespaceId,
        key: Key,
    ) -> Result<WatchOutcome> {
        self.coordinator.watch(txn, &self.store, namespace, key)
    }

    /// Forget every watch of a transaction that is not yet queuing
    pub fn unwatch(&self, txn: &mut TransactionContext) -> Result<()> {
        self.coordinator.unwatch(txn)
    }

    /// Enter queuing mode
    pub fn multi(&self, txn: &mut TransactionContext) -> Result<()> {
        self.coordinator.multi(txn)
    }

    /// Queue a command against `namespace`
    pub fn enqueue(
        &self,
        txn: &mut TransactionContext,
        namespace: NamespaceId,
        command: Command,
    ) -> Result<()> {
        self.coordinator.enqueue(txn, namespace, command)
    }

    /// Validate watches and apply the queue atomically
    ///
    /// # Returns
    /// * `Ok(results)` - one result per queued command, in order
    /// * `Err(Conflict)` - a watched key changed; nothing was applied
    pub fn execute(&self, txn: &mut TransactionContext) -> Result<Vec<CommandResult>> {
        self.coordinator.execute(txn, &self.store)
    }

    /// Drop a transaction without touching the store
    pub fn discard(&self, txn: &mut TransactionContext) -> Result<()> {
        self.coordinator.discard(txn)
    }
}
