//! Database engine for watchkv
//!
//! This crate orchestrates the lower layers:
//! - Database: owns the shared store, configuration and coordinator
//! - Transaction coordination: watch, multi, enqueue, execute, discard
//! - Global admin operations: flush one namespace or all of them
//! - Configuration from `watchkv.toml`
//!
//! The engine is the only component that knows about both the store and the
//! transaction manager.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coordinator;
pub mod database;

pub use coordinator::{TransactionCoordinator, TransactionMetrics};
pub use database::{Database, WatchKvConfig, CONFIG_FILE_NAME, DEFAULT_NAMESPACES};
