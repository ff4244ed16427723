//! Stateful session: namespace selection and one active transaction.
//!
//! The [`Session`] wraps an [`Executor`] and owns at most one
//! [`TransactionContext`]. It is the handle a front-end keeps per client
//! connection.
//!
//! # Usage
//!
//! ```text
//! let mut session = Session::new(db.clone());
//!
//! session.begin_transaction()?;
//! session.watch("balance")?;
//! session.multi()?;
//!
//! // Commands are buffered while queuing
//! assert_eq!(session.execute(Command::decr_by("balance", 30))?, Output::Queued);
//!
//! let results = session.exec()?;
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use watchkv_concurrency::{TransactionContext, WatchOutcome};
use watchkv_core::{Command, CommandResult, Error, Key, NamespaceId, Output, Result};
use watchkv_engine::Database;

use crate::Executor;

/// Snapshot of the session's active transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    /// Transaction id
    pub id: u64,
    /// State name (`Idle`, `Watching`, `Queuing`)
    pub state: String,
    /// Number of watched keys
    pub watched_keys: usize,
    /// Number of queued commands
    pub queued_commands: usize,
}

/// A stateful session that wraps an [`Executor`] and manages an optional
/// open transaction.
///
/// When no transaction is queuing, commands delegate to the inner
/// `Executor` and run immediately. While queuing, [`Session::execute`]
/// buffers them and answers [`Output::Queued`].
pub struct Session {
    executor: Executor,
    db: Arc<Database>,
    namespace: NamespaceId,
    txn_ctx: Option<TransactionContext>,
}

impl Session {
    /// Create a new session in the default namespace.
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            executor: Executor::new(db.clone()),
            db,
            namespace: NamespaceId::DEFAULT,
            txn_ctx: None,
        }
    }

    /// Currently selected namespace.
    pub fn namespace(&self) -> NamespaceId {
        self.namespace
    }

    /// Select the namespace later commands target.
    ///
    /// Commands already queued keep the namespace they were queued with.
    pub fn select(&mut self, namespace: NamespaceId) -> Result<()> {
        self.db.check_namespace(namespace)?;
        debug!(target: "watchkv::session", from = %self.namespace, to = %namespace, "Namespace selected");
        self.namespace = namespace;
        Ok(())
    }

    /// Returns whether a transaction is currently active.
    pub fn in_transaction(&self) -> bool {
        self.txn_ctx.is_some()
    }

    /// Returns whether commands are being buffered.
    pub fn is_queuing(&self) -> bool {
        self.txn_ctx
            .as_ref()
            .map(TransactionContext::is_queuing)
            .unwrap_or(false)
    }

    /// Get a reference to the underlying executor.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    // =========================================================================
    // Transaction lifecycle
    // =========================================================================

    /// Begin a transaction, returning its id.
    ///
    /// # Errors
    /// `NestedTransaction` if one is already active; the active transaction
    /// is left untouched.
    pub fn begin_transaction(&mut self) -> Result<u64> {
        if let Some(ctx) = &self.txn_ctx {
            warn!(target: "watchkv::session", txn_id = ctx.txn_id(), "Nested transaction rejected");
            return Err(Error::NestedTransaction);
        }
        let ctx = self.db.begin_transaction();
        let id = ctx.txn_id();
        self.txn_ctx = Some(ctx);
        Ok(id)
    }

    fn active(&mut self) -> Result<&mut TransactionContext> {
        self.txn_ctx.as_mut().ok_or(Error::NoActiveTransaction)
    }

    /// Watch a key in the current namespace.
    ///
    /// Ignored once queuing has begun.
    pub fn watch(&mut self, key: impl Into<Key>) -> Result<WatchOutcome> {
        let namespace = self.namespace;
        self.watch_in(namespace, key)
    }

    /// Watch a key in an explicit namespace.
    pub fn watch_in(
        &mut self,
        namespace: NamespaceId,
        key: impl Into<Key>,
    ) -> Result<WatchOutcome> {
        self.db.check_namespace(namespace)?;
        let db = Arc::clone(&self.db);
        let ctx = self.active()?;
        db.watch(ctx, namespace, key.into())
    }

    /// Forget every watch. A no-op without an active transaction.
    pub fn unwatch(&mut self) -> Result<()> {
        match self.txn_ctx.as_mut() {
            Some(ctx) => self.db.unwatch(ctx),
            None => Ok(()),
        }
    }

    /// Enter queuing mode.
    ///
    /// # Errors
    /// `NoActiveTransaction` without `begin_transaction`; `NestedTransaction`
    /// if already queuing.
    pub fn multi(&mut self) -> Result<()> {
        let db = Arc::clone(&self.db);
        let ctx = self.active()?;
        db.multi(ctx)
    }

    /// Queue a command against the current namespace.
    pub fn enqueue(&mut self, command: Command) -> Result<()> {
        let namespace = self.namespace;
        let db = Arc::clone(&self.db);
        let ctx = self.active()?;
        db.enqueue(ctx, namespace, command)
    }

    /// Validate watches and apply the queue atomically.
    ///
    /// The transaction ends whether it committed or aborted. If it was not
    /// queuing yet, the call fails with `InvalidTransactionState` and the
    /// transaction stays active.
    pub fn exec(&mut self) -> Result<Vec<CommandResult>> {
        let mut ctx = self.txn_ctx.take().ok_or(Error::NoActiveTransaction)?;
        let result = self.db.execute(&mut ctx);
        if !ctx.is_terminal() {
            self.txn_ctx = Some(ctx);
        }
        result
    }

    /// Drop the active transaction without touching the store.
    ///
    /// # Errors
    /// `NoActiveTransaction` if there is none, including a second discard.
    pub fn discard(&mut self) -> Result<()> {
        let mut ctx = self.txn_ctx.take().ok_or(Error::NoActiveTransaction)?;
        self.db.discard(&mut ctx)
    }

    /// Describe the active transaction, if any.
    pub fn transaction_info(&self) -> Option<TransactionInfo> {
        self.txn_ctx.as_ref().map(|ctx| TransactionInfo {
            id: ctx.txn_id(),
            state: ctx.status().to_string(),
            watched_keys: ctx.watch_set().len(),
            queued_commands: ctx.queue().len(),
        })
    }

    // =========================================================================
    // Command routing
    // =========================================================================

    /// Execute a command, or queue it when the transaction is queuing.
    pub fn execute(&mut self, cmd: Command) -> CommandResult {
        if self.is_queuing() {
            self.enqueue(cmd)?;
            Ok(Output::Queued)
        } else {
            self.executor.execute(self.namespace, cmd)
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(mut ctx) = self.txn_ctx.take() {
            let _ = self.db.discard(&mut ctx);
        }
    }
}
