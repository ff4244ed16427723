//! Transaction coordinator for managing transaction lifecycle
//!
//! The TransactionCoordinator wraps TransactionManager and adds:
//! - Watch registration against the live store
//! - Transaction metrics (started, committed, aborted, discarded)
//! - Lifecycle logging under the `watchkv::txn` target
//!
//! The engine never retries a conflicting transaction. Callers re-watch and
//! re-queue.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use watchkv_concurrency::{
    CommandErrorPolicy, TransactionContext, TransactionManager, WatchOutcome,
};
use watchkv_core::{Command, CommandResult, Key, NamespaceId, Result};
use watchkv_storage::KeyValueStore;

/// Transaction coordinator for the database
///
/// # Memory Ordering
///
/// The metric counters use Relaxed ordering: they are purely observational
/// and do not synchronize any other memory operations.
pub struct TransactionCoordinator {
    /// Transaction manager for ID allocation and commit
    manager: TransactionManager,
    /// Transactions begun and not yet terminal
    active_count: AtomicU64,
    /// Total transactions started
    total_started: AtomicU64,
    /// Total transactions committed
    total_committed: AtomicU64,
    /// Total transactions aborted at execute
    total_aborted: AtomicU64,
    /// Total transactions discarded by the caller
    total_discarded: AtomicU64,
}

impl TransactionCoordinator {
    /// Create new coordinator
    pub fn new(policy: CommandErrorPolicy) -> Self {
        Self {
            manager: TransactionManager::new(policy),
            active_count: AtomicU64::new(0),
            total_started: AtomicU64::new(0),
            total_committed: AtomicU64::new(0),
            total_aborted: AtomicU64::new(0),
            total_discarded: AtomicU64::new(0),
        }
    }

    /// Configured command-error policy
    pub fn policy(&self) -> CommandErrorPolicy {
        self.manager.policy()
    }

    /// Start a new transaction in the `Idle` state
    pub fn start_transaction(&self) -> TransactionContext {
        let txn = self.manager.begin();
        self.active_count.fetch_add(1, Ordering::Relaxed);
        self.total_started.fetch_add(1, Ordering::Relaxed);
        debug!(target: "watchkv::txn", txn_id = txn.txn_id(), "Transaction started");
        txn
    }

    /// Watch a key at its current effective version
    pub fn watch(
        &self,
        txn: &mut TransactionContext,
        store: &KeyValueStore,
        namespace: NamespaceId,
        key: Key,
    ) -> Result<WatchOutcome> {
        let version = store.effective_version(namespace, &key);
        let outcome = txn.watch(namespace, key, version)?;
        match outcome {
            WatchOutcome::Ignored => warn!(
                target: "watchkv::txn",
                txn_id = txn.txn_id(),
                %namespace,
                "Watch after multi has no effect"
            ),
            _ => debug!(
                target: "watchkv::txn",
                txn_id = txn.txn_id(),
                %namespace,
                %version,
                "Key watched"
            ),
        }
        Ok(outcome)
    }

    /// Clear a transaction's watches
    pub fn unwatch(&self, txn: &mut TransactionContext) -> Result<()> {
        txn.unwatch()
    }

    /// Enter queuing mode
    pub fn multi(&self, txn: &mut TransactionContext) -> Result<()> {
        txn.multi()?;
        debug!(
            target: "watchkv::txn",
            txn_id = txn.txn_id(),
            watched = txn.watch_set().len(),
            "Queuing started"
        );
        Ok(())
    }

    /// Buffer a command for execute
    pub fn enqueue(
        &self,
        txn: &mut TransactionContext,
        namespace: NamespaceId,
        command: Command,
    ) -> Result<()> {
        let name = command.name();
        txn.enqueue(namespace, command)?;
        debug!(
            target: "watchkv::txn",
            txn_id = txn.txn_id(),
            %namespace,
            command = name,
            "Command queued"
        );
        Ok(())
    }

    /// Validate and apply a queued transaction
    ///
    /// Records commit/abort metrics. A call rejected because the transaction
    /// is not queuing leaves it active and records nothing.
    pub fn execute(
        &self,
        txn: &mut TransactionContext,
        store: &KeyValueStore,
    ) -> Result<Vec<CommandResult>> {
        let queued = txn.queue().len();
        match self.manager.commit(txn, store) {
            Ok(results) => {
                self.record_commit();
                info!(
                    target: "watchkv::txn",
                    txn_id = txn.txn_id(),
                    commands = queued,
                    failed = results.iter().filter(|r| r.is_err()).count(),
                    "Transaction committed"
                );
                Ok(results)
            }
            Err(e) => {
                if txn.is_terminal() {
                    self.record_abort();
                    warn!(target: "watchkv::txn", txn_id = txn.txn_id(), error = %e, "Transaction aborted");
                }
                Err(e)
            }
        }
    }

    /// Drop a transaction without touching the store
    pub fn discard(&self, txn: &mut TransactionContext) -> Result<()> {
        txn.mark_discarded()?;
        self.record_discard();
        debug!(target: "watchkv::txn", txn_id = txn.txn_id(), "Transaction discarded");
        Ok(())
    }

    fn decrement_active(&self) {
        // Saturating decrement to prevent underflow
        let _ = self
            .active_count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |x| {
                Some(x.saturating_sub(1))
            });
    }

    /// Record transaction commit
    pub fn record_commit(&self) {
        self.decrement_active();
        self.total_committed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record transaction abort
    pub fn record_abort(&self) {
        self.decrement_active();
        self.total_aborted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record transaction discard
    pub fn record_discard(&self) {
        self.decrement_active();
        self.total_discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Get transaction metrics
    pub fn metrics(&self) -> TransactionMetrics {
        let started = self.total_started.load(Ordering::Relaxed);
        let committed = self.total_committed.load(Ordering::Relaxed);
        TransactionMetrics {
            active_count: self.active_count.load(Ordering::Relaxed),
            total_started: started,
            total_committed: committed,
            total_aborted: self.total_aborted.load(Ordering::Relaxed),
            total_discarded: self.total_discarded.load(Ordering::Relaxed),
            commit_rate: if started > 0 {
                committed as f64 / started as f64
            } else {
                0.0
            },
        }
    }

    /// Get current active transaction count
    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::Relaxed)
    }
}

/// Transaction metrics
#[derive(Debug, Clone)]
pub struct TransactionMetrics {
    /// Number of currently active transactions
    pub active_count: u64,
    /// Total number of transactions started
    pub total_started: u64,
    /// Total number of transactions committed
    pub total_committed: u64,
    /// Total number of transactions aborted at execute
    pub total_aborted: u64,
    /// Total number of transactions discarded
    pub total_discarded: u64,
    /// Commit success rate (committed / started)
    pub commit_rate: f64,
}

impl TransactionMetrics {
    /// Total transactions that completed (committed + aborted + discarded)
    pub fn total_completed(&self) -> u64 {
        self.total_committed + self.total_aborted + self.total_discarded
    }

    /// Abort rate (aborted / started)
    pub fn abort_rate(&self) -> f64 {
        if self.total_started > 0 {
            self.total_aborted as f64 / self.total_started as f64
        } else {
            0.0
        }
    }
}
