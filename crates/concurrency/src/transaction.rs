//! Transaction context for watch-based OCC
//!
//! A `TransactionContext` owns one transaction's watch set, command queue and
//! lifecycle state. It is owned exclusively by the session that began it and
//! is never shared across threads.
//!
//! The context itself never touches the store; `TransactionManager::commit`
//! drives validation and apply under the store write guard and then moves
//! the context into a terminal state.

use std::fmt;

use watchkv_core::{Command, EffectiveVersion, Error, Key, NamespaceId, Result};
use watchkv_storage::StoreState;

use crate::queue::CommandQueue;
use crate::validation::{validate_watch_set, ValidationResult};
use crate::watch::WatchSet;

/// Status of a transaction
///
/// State transitions:
/// - `Idle` → `Watching` (first watch)
/// - `Idle` | `Watching` → `Queuing` (multi)
/// - `Watching` → `Idle` (unwatch)
/// - `Queuing` → `Committed` (validation passed, queue applied)
/// - `Queuing` → `Aborted` (watch conflict, or a failing command under the
///   abort policy)
/// - any non-terminal state → `Discarded`
///
/// Terminal states (no transitions allowed):
/// - `Committed`
/// - `Aborted`
/// - `Discarded`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Begun, nothing watched yet
    Idle,
    /// At least one key watched, not yet queuing
    Watching,
    /// Buffering commands until execute
    Queuing,
    /// Queue applied
    Committed,
    /// Execute failed; nothing applied
    Aborted {
        /// Human-readable reason for abort
        reason: String,
    },
    /// Dropped by the caller before execute
    Discarded,
}

impl TransactionStatus {
    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Committed
                | TransactionStatus::Aborted { .. }
                | TransactionStatus::Discarded
        )
    }

    /// Short state name used in errors and logs
    pub fn name(&self) -> &'static str {
        match self {
            TransactionStatus::Idle => "Idle",
            TransactionStatus::Watching => "Watching",
            TransactionStatus::Queuing => "Queuing",
            TransactionStatus::Committed => "Committed",
            TransactionStatus::Aborted { .. } => "Aborted",
            TransactionStatus::Discarded => "Discarded",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a `watch` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// Key added to the watch set
    Watched,
    /// Key was already watched; first observation kept
    AlreadyWatched,
    /// Transaction is queuing; the watch has no effect
    Ignored,
}

/// One transaction: watch set, command queue and lifecycle state
#[derive(Debug)]
pub struct TransactionContext {
    txn_id: u64,
    status: TransactionStatus,
    watch_set: WatchSet,
    queue: CommandQueue,
}

impl TransactionContext {
    /// Create a transaction in the `Idle` state
    pub fn new(txn_id: u64) -> Self {
        TransactionContext {
            txn_id,
            status: TransactionStatus::Idle,
            watch_set: WatchSet::new(),
            queue: CommandQueue::new(),
        }
    }

    /// Transaction id
    #[inline]
    pub fn txn_id(&self) -> u64 {
        self.txn_id
    }

    /// Current status
    #[inline]
    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    /// Watched keys
    pub fn watch_set(&self) -> &WatchSet {
        &self.watch_set
    }

    /// Queued commands
    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// Whether commands are being buffered
    pub fn is_queuing(&self) -> bool {
        self.status == TransactionStatus::Queuing
    }

    /// Whether the transaction has finished
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Reason recorded when the transaction aborted
    pub fn abort_reason(&self) -> Option<&str> {
        match &self.status {
            TransactionStatus::Aborted { reason } => Some(reason),
            _ => None,
        }
    }

    fn invalid_state(&self, operation: &str) -> Error {
        Error::InvalidTransactionState {
            operation: operation.to_string(),
            state: self.status.to_string(),
        }
    }

    fn ensure_not_terminal(&self, operation: &str) -> Result<()> {
        if self.is_terminal() {
            Err(self.invalid_state(operation))
        } else {
            Ok(())
        }
    }

    /// Check that the transaction is buffering commands
    ///
    /// # Errors
    /// `InvalidTransactionState` in any other state.
    pub fn ensure_queuing(&self, operation: &str) -> Result<()> {
        if self.is_queuing() {
            Ok(())
        } else {
            Err(self.invalid_state(operation))
        }
    }

    /// Record a watched key with the version observed now
    ///
    /// While queuing the call is accepted and ignored.
    ///
    /// # State Transition
    /// `Idle` | `Watching` → `Watching`
    pub fn watch(
        &mut self,
        namespace: NamespaceId,
        key: Key,
        version: EffectiveVersion,
    ) -> Result<WatchOutcome> {
        self.ensure_not_terminal("watch")?;
        if self.is_queuing() {
            return Ok(WatchOutcome::Ignored);
        }
        self.status = TransactionStatus::Watching;
        if self.watch_set.watch(namespace, key, version) {
            Ok(WatchOutcome::Watched)
        } else {
            Ok(WatchOutcome::AlreadyWatched)
        }
    }

    /// Forget all watches
    ///
    /// No-op once queuing has begun.
    ///
    /// # State Transition
    /// `Idle` | `Watching` → `Idle`
    pub fn unwatch(&mut self) -> Result<()> {
        self.ensure_not_terminal("unwatch")?;
        if !self.is_queuing() {
            self.watch_set.clear();
            self.status = TransactionStatus::Idle;
        }
        Ok(())
    }

    /// Enter queuing mode
    ///
    /// # Errors
    /// `NestedTransaction` if already queuing.
    ///
    /// # State Transition
    /// `Idle` | `Watching` → `Queuing`
    pub fn multi(&mut self) -> Result<()> {
        self.ensure_not_terminal("multi")?;
        if self.is_queuing() {
            return Err(Error::NestedTransaction);
        }
        self.status = TransactionStatus::Queuing;
        Ok(())
    }

    /// Append a command to the queue
    ///
    /// Nothing is executed until commit.
    pub fn enqueue(&mut self, namespace: NamespaceId, command: Command) -> Result<()> {
        self.ensure_queuing("enqueue")?;
        self.queue.push(namespace, command);
        Ok(())
    }

    /// Validate the watch set against `state`
    pub fn validate(&self, state: &StoreState) -> ValidationResult {
        validate_watch_set(&self.watch_set, state)
    }

    /// Whether any watched key changed
    pub fn check_conflicts(&self, state: &StoreState) -> bool {
        !self.validate(state).is_valid()
    }

    /// Transition to Committed
    ///
    /// # State Transition
    /// `Queuing` → `Committed`
    pub fn mark_committed(&mut self) -> Result<()> {
        self.ensure_queuing("commit")?;
        self.status = TransactionStatus::Committed;
        self.release();
        Ok(())
    }

    /// Transition to Aborted, dropping the queue and watches
    ///
    /// # State Transition
    /// `Queuing` → `Aborted`
    pub fn mark_aborted(&mut self, reason: String) -> Result<()> {
        self.ensure_queuing("abort")?;
        self.status = TransactionStatus::Aborted { reason };
        self.release();
        Ok(())
    }

    /// Transition to Discarded, dropping the queue and watches
    ///
    /// # State Transition
    /// any non-terminal → `Discarded`
    pub fn mark_discarded(&mut self) -> Result<()> {
        self.ensure_not_terminal("discard")?;
        self.status = TransactionStatus::Discarded;
        self.release();
        Ok(())
    }

    fn release(&mut self) {
        self.watch_set.clear();
        self.queue.clear();
    }
}
