//! watchkv - embedded transactional key-value engine
//!
//! watchkv keeps byte-string values in numbered namespaces and runs
//! transactions with WATCH-based optimistic concurrency: a transaction
//! watches keys, queues commands, and on execute either applies the whole
//! queue atomically or fails with a conflict if a watched key changed.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use watchkv::{Command, Database, Output, Session};
//!
//! let db = Arc::new(Database::new());
//! let mut session = Session::new(db.clone());
//!
//! session.execute(Command::set("balance", "100"))?;
//!
//! session.begin_transaction()?;
//! session.watch("balance")?;
//! session.multi()?;
//! assert_eq!(session.execute(Command::decr_by("balance", 30))?, Output::Queued);
//! let results = session.exec()?;   // Err(Error::Conflict { .. }) if balance moved
//! ```
//!
//! # Architecture
//!
//! [`Session`] is the per-client handle; [`Executor`] dispatches direct
//! commands. Both sit on a [`Database`], which owns the shared store and the
//! transaction coordinator. Several databases may share one store through
//! [`Database::with_store`].

pub use watchkv_executor::*;

pub use watchkv_concurrency::{CommandErrorPolicy, TransactionStatus};
pub use watchkv_core::{EffectiveVersion, VersionedValue};
pub use watchkv_engine::{
    Database, TransactionMetrics, WatchKvConfig, CONFIG_FILE_NAME, DEFAULT_NAMESPACES,
};
pub use watchkv_storage::KeyValueStore;
