//! Transaction manager for coordinating commit operations
//!
//! Provides atomic commit by running validation and apply under one store
//! write guard.
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. ensure_queuing()      - execute is only valid after multi
//! 2. store.write()         - exclusive section begins
//! 3. validate()            - compare every watched effective version
//! 4. IF conflicts: mark_aborted() and return Error::Conflict
//! 5. apply each queued command in enqueue order, collecting results
//!    (Abort policy: first failure rolls back via the undo log,
//!     mark_aborted() and return Error::CommandAborted)
//! 6. mark_committed()
//! 7. guard dropped         - exclusive section ends
//! 8. info! each applied flush on watchkv::admin
//! 9. Return per-command results
//! ```
//!
//! The exclusive section is bounded by O(watched keys + queued commands) and
//! performs no I/O.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use watchkv_core::{Command, CommandResult, Error, Result};
use watchkv_storage::{KeyValueStore, StoreState, UndoLog};

use crate::transaction::TransactionContext;

/// What `execute` does when a queued command fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandErrorPolicy {
    /// Record the error in the command's slot and keep applying
    #[default]
    Continue,
    /// Roll back everything applied so far and fail the whole execute
    Abort,
}

impl CommandErrorPolicy {
    /// Config-file spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandErrorPolicy::Continue => "continue",
            CommandErrorPolicy::Abort => "abort",
        }
    }
}

impl FromStr for CommandErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "continue" => Ok(CommandErrorPolicy::Continue),
            "abort" => Ok(CommandErrorPolicy::Abort),
            other => Err(Error::Config {
                reason: format!(
                    "invalid command_error_policy '{}': expected \"continue\" or \"abort\"",
                    other
                ),
            }),
        }
    }
}

/// Manages transaction ids and atomic commits
pub struct TransactionManager {
    /// Next transaction ID
    next_txn_id: AtomicU64,
    /// Per-command failure policy applied at commit
    policy: CommandErrorPolicy,
}

impl TransactionManager {
    /// Create a new transaction manager
    pub fn new(policy: CommandErrorPolicy) -> Self {
        TransactionManager {
            next_txn_id: AtomicU64::new(1),
            policy,
        }
    }

    /// Configured command-error policy
    pub fn policy(&self) -> CommandErrorPolicy {
        self.policy
    }

    /// Allocate next transaction ID
    pub fn next_txn_id(&self) -> u64 {
        self.next_txn_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Create a fresh transaction
    pub fn begin(&self) -> TransactionContext {
        TransactionContext::new(self.next_txn_id())
    }

    /// Commit a transaction atomically
    ///
    /// # Returns
    /// - `Ok(results)`: one result per queued command, in enqueue order
    /// - `Err(Error::Conflict)`: a watched key changed; nothing applied
    /// - `Err(Error::CommandAborted)`: abort policy only; nothing applied
    /// - `Err(Error::InvalidTransactionState)`: not queuing
    pub fn commit(
        &self,
        txn: &mut TransactionContext,
        store: &KeyValueStore,
    ) -> Result<Vec<CommandResult>> {
        txn.ensure_queuing("execute")?;

        let mut state = store.write();

        let validation = txn.validate(&state);
        if !validation.is_valid() {
            let err = validation.into_error();
            txn.mark_aborted(err.to_string())?;
            return Err(err);
        }

        let results = match self.policy {
            CommandErrorPolicy::Continue => apply_all(txn, &mut state),
            CommandErrorPolicy::Abort => match apply_or_rollback(txn, &mut state) {
                Ok(results) => results,
                Err(err) => {
                    txn.mark_aborted(err.to_string())?;
                    return Err(err);
                }
            },
        };

        txn.mark_committed()?;
        drop(state);

        log_queued_flushes(txn, &results);
        Ok(results)
    }
}

/// Report flushes applied by a committed queue on the admin target
fn log_queued_flushes(txn: &TransactionContext, results: &[CommandResult]) {
    for (queued, result) in txn.queue().iter().zip(results) {
        if result.is_err() {
            continue;
        }
        match queued.command {
            Command::FlushNamespace => info!(
                target: "watchkv::admin",
                txn_id = txn.txn_id(),
                namespace = %queued.namespace,
                "Namespace flushed in transaction"
            ),
            Command::FlushAll => info!(
                target: "watchkv::admin",
                txn_id = txn.txn_id(),
                "All namespaces flushed in transaction"
            ),
            _ => {}
        }
    }
}

fn apply_all(txn: &TransactionContext, state: &mut StoreState) -> Vec<CommandResult> {
    txn.queue()
        .iter()
        .map(|queued| state.apply(queued.namespace, &queued.command))
        .collect()
}

fn apply_or_rollback(
    txn: &TransactionContext,
    state: &mut StoreState,
) -> Result<Vec<CommandResult>> {
    let mut undo = UndoLog::new();
    let mut results = Vec::with_capacity(txn.queue().len());

    for (index, queued) in txn.queue().iter().enumerate() {
        undo.record(state, queued.namespace, &queued.command);
        match state.apply(queued.namespace, &queued.command) {
            Ok(output) => results.push(Ok(output)),
            Err(err) => {
                debug!(
                    target: "watchkv::txn",
                    txn_id = txn.txn_id(),
                    index,
                    undone = undo.len(),
                    "Rolling back queued commands"
                );
                undo.rollback(state);
                return Err(Error::CommandAborted {
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(results)
}
