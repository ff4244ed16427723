//! CommandQueue: commands buffered between MULTI and EXEC
//!
//! Each entry carries the namespace the session had selected when the
//! command was queued, so a `select` between two enqueues changes the target
//! of later commands only.

use watchkv_core::{Command, NamespaceId};

/// A command bound to its target namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedCommand {
    /// Namespace the command runs against
    pub namespace: NamespaceId,
    /// The command itself
    pub command: Command,
}

impl QueuedCommand {
    /// Bind a command to a namespace
    pub fn new(namespace: NamespaceId, command: Command) -> Self {
        Self { namespace, command }
    }
}

/// Ordered buffer of pending commands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandQueue {
    commands: Vec<QueuedCommand>,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command in arrival order
    pub fn push(&mut self, namespace: NamespaceId, command: Command) {
        self.commands.push(QueuedCommand::new(namespace, command));
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop every queued command
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Iterate in enqueue order
    pub fn iter(&self) -> std::slice::Iter<'_, QueuedCommand> {
        self.commands.iter()
    }
}

impl<'a> IntoIterator for &'a CommandQueue {
    type Item = &'a QueuedCommand;
    type IntoIter = std::slice::Iter<'a, QueuedCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
