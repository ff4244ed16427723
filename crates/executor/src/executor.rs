//! The Executor - stateless dispatcher for direct commands.
//!
//! The Executor routes a [`Command`] to the matching database operation
//! outside of any transaction. Namespace selection and transactions are
//! session state and live in [`Session`](crate::Session).

use std::sync::Arc;

use watchkv_core::{Command, CommandResult, NamespaceId};
use watchkv_engine::Database;

/// The command executor.
///
/// The Executor is **stateless**: it holds a reference to the database but
/// maintains no state of its own.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads.
///
/// # Example
///
/// ```text
/// let executor = Executor::new(db);
/// executor.execute(NamespaceId::DEFAULT, Command::set("foo", "42"))?;
///
/// let results = executor.execute_many(NamespaceId::DEFAULT, vec![
///     Command::get("foo"),
///     Command::get("bar"),
/// ]);
/// ```
pub struct Executor {
    db: Arc<Database>,
}

impl Executor {
    /// Create a new executor wrapping a database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Execute a single command against `namespace`.
    ///
    /// # Errors
    /// `InvalidNamespace` if the namespace is outside the configured range,
    /// otherwise whatever the command itself reports.
    pub fn execute(&self, namespace: NamespaceId, cmd: Command) -> CommandResult {
        self.db.check_namespace(namespace)?;
        self.db.execute_command(namespace, &cmd)
    }

    /// Execute multiple commands in order.
    ///
    /// Each command runs on its own; the batch is not atomic and a failing
    /// command does not stop the ones after it.
    pub fn execute_many(&self, namespace: NamespaceId, cmds: Vec<Command>) -> Vec<CommandResult> {
        cmds.into_iter()
            .map(|cmd| self.execute(namespace, cmd))
            .collect()
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }
}
