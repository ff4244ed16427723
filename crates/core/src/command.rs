//! Command and Output types
//!
//! Commands are the instruction set of the engine. Every operation that can
//! be executed directly or queued inside a transaction is a variant of
//! [`Command`]. Commands are:
//! - **Self-contained**: all operands are in the variant
//! - **Serializable**: a front-end can decode them from its wire format
//! - **Namespace-free**: the namespace comes from the issuing session
//!
//! Every command produces exactly one [`Output`] variant on success.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Key;
use crate::value::Value;

/// A self-contained, serializable operation
///
/// | Command | Output |
/// |---------|--------|
/// | `Get` | `Output::Maybe` |
/// | `Set` | `Output::Version` |
/// | `IncrBy` / `DecrBy` | `Output::Int` |
/// | `Delete` | `Output::Bool` (true if a live key was removed) |
/// | `DbSize` | `Output::Uint` |
/// | `FlushNamespace` / `FlushAll` | `Output::Unit` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    /// Read a key
    Get { key: Key },

    /// Create or overwrite a key
    Set { key: Key, value: Value },

    /// Add `delta` to an integer value (absent keys seed at 0)
    IncrBy { key: Key, delta: i64 },

    /// Subtract `delta` from an integer value (absent keys seed at 0)
    DecrBy { key: Key, delta: i64 },

    /// Remove a key
    Delete { key: Key },

    /// Count live keys in the namespace
    DbSize,

    /// Remove every key in the namespace
    FlushNamespace,

    /// Remove every key in every namespace
    FlushAll,
}

impl Command {
    /// Build a `Get`
    pub fn get(key: impl Into<Key>) -> Self {
        Command::Get { key: key.into() }
    }

    /// Build a `Set`
    pub fn set(key: impl Into<Key>, value: impl Into<Value>) -> Self {
        Command::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Build an `IncrBy`
    pub fn incr_by(key: impl Into<Key>, delta: i64) -> Self {
        Command::IncrBy {
            key: key.into(),
            delta,
        }
    }

    /// Build a `DecrBy`
    pub fn decr_by(key: impl Into<Key>, delta: i64) -> Self {
        Command::DecrBy {
            key: key.into(),
            delta,
        }
    }

    /// Build a `Delete`
    pub fn delete(key: impl Into<Key>) -> Self {
        Command::Delete { key: key.into() }
    }

    /// Command name, as used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get { .. } => "GET",
            Command::Set { .. } => "SET",
            Command::IncrBy { .. } => "INCRBY",
            Command::DecrBy { .. } => "DECRBY",
            Command::Delete { .. } => "DEL",
            Command::DbSize => "DBSIZE",
            Command::FlushNamespace => "FLUSHDB",
            Command::FlushAll => "FLUSHALL",
        }
    }

    /// The key this command targets, if any
    pub fn key(&self) -> Option<&Key> {
        match self {
            Command::Get { key }
            | Command::Set { key, .. }
            | Command::IncrBy { key, .. }
            | Command::DecrBy { key, .. }
            | Command::Delete { key } => Some(key),
            Command::DbSize | Command::FlushNamespace | Command::FlushAll => None,
        }
    }

    /// Whether executing this command may mutate the store
    pub fn is_write(&self) -> bool {
        !matches!(self, Command::Get { .. } | Command::DbSize)
    }
}

/// Successful command results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    /// No return value (flush operations)
    Unit,

    /// Optional value (reads of possibly-absent keys)
    Maybe(Option<Value>),

    /// New per-key version after a write
    Version(u64),

    /// Integer result of an arithmetic command
    Int(i64),

    /// Boolean result
    Bool(bool),

    /// Unsigned count
    Uint(u64),

    /// Command accepted into the transaction queue
    Queued,
}

impl Output {
    /// The value carried by `Maybe`, if any
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Output::Maybe(Some(v)) => Some(v),
            _ => None,
        }
    }

    /// The integer carried by `Int`, if any
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Output::Int(n) => Some(*n),
            _ => None,
        }
    }
}

/// Outcome of one command: the slot type returned from `execute()`
pub type CommandResult = Result<Output>;
