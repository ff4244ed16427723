//! Error types for watchkv
//!
//! All errors produced by the engine are represented by the [`Error`] enum.
//! We use `thiserror` for `Display` and `Error` implementations.
//!
//! Errors are `Clone + Serialize` because a failing queued command records
//! its error inline in the result slot returned from `execute()`, and those
//! results may be handed to a front-end that serializes them.
//!
//! # Categories
//!
//! | Category | Variants | Scope |
//! |----------|----------|-------|
//! | Command | `NotAnInteger`, `Overflow` | One command; recorded inline during EXEC |
//! | Transaction | `Conflict`, `NestedTransaction`, `NoActiveTransaction`, `InvalidTransactionState`, `CommandAborted` | Whole call; store untouched |
//! | Session | `InvalidNamespace` | Rejected before reaching the store |
//! | System | `Config`, `Io` | Configuration loading |

use serde::{Deserialize, Serialize};
use std::io;

/// Result type alias for watchkv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the watchkv engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Command Errors ====================
    /// Arithmetic command on a value that is not a base-10 integer
    #[error("value at key '{key}' is not an integer")]
    NotAnInteger { key: String },

    /// Increment or decrement would overflow a 64-bit integer
    #[error("increment or decrement of key '{key}' would overflow")]
    Overflow { key: String },

    // ==================== Transaction Errors ====================
    /// One or more watched keys changed between `watch` and `execute`
    #[error("transaction aborted: {} watched key(s) changed", .keys.len())]
    Conflict { keys: Vec<String> },

    /// A transaction is already active on this session
    #[error("transaction already active on this session")]
    NestedTransaction,

    /// No transaction is active on this session
    #[error("no active transaction")]
    NoActiveTransaction,

    /// Operation not allowed in the transaction's current state
    #[error("cannot {operation} while transaction is {state}")]
    InvalidTransactionState { operation: String, state: String },

    /// A queued command failed under the abort-on-error policy
    #[error("command {index} failed, transaction rolled back: {reason}")]
    CommandAborted { index: usize, reason: String },

    // ==================== Session Errors ====================
    /// Namespace index outside the configured range
    #[error("namespace {namespace} out of range (limit {limit})")]
    InvalidNamespace { namespace: u32, limit: u32 },

    // ==================== System Errors ====================
    /// Invalid or unreadable configuration
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// I/O error
    #[error("I/O error: {reason}")]
    Io { reason: String },
}

impl Error {
    /// Whether the caller should retry by re-watching and re-queuing
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Whether this error is scoped to a single queued command
    pub fn is_command_error(&self) -> bool {
        matches!(self, Error::NotAnInteger { .. } | Error::Overflow { .. })
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io {
            reason: e.to_string(),
        }
    }
}
