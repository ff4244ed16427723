//! Concurrency layer for watchkv
//!
//! This crate implements watch-based optimistic concurrency control with:
//! - WatchSet: keys and the effective versions observed when watched
//! - CommandQueue: commands buffered between multi and execute
//! - TransactionContext: the Idle → Watching → Queuing → terminal state machine
//! - Conflict detection at commit time
//! - TransactionManager: check-then-apply under the store write guard

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod queue;
pub mod transaction;
pub mod validation;
pub mod watch;

pub use manager::{CommandErrorPolicy, TransactionManager};
pub use queue::{CommandQueue, QueuedCommand};
pub use transaction::{TransactionContext, TransactionStatus, WatchOutcome};
pub use validation::{validate_watch_set, ConflictType, ValidationResult};
pub use watch::WatchSet;
