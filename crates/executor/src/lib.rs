//! # watchkv Executor
//!
//! The command layer a front-end talks to. It provides:
//! - [`Executor`] - stateless dispatch of direct commands
//! - [`Session`] - per-client state: selected namespace and one transaction
//!
//! ## Quick Start
//!
//! ```text
//! use watchkv_executor::{Command, Session};
//!
//! let db = Arc::new(Database::new());
//! let mut session = Session::new(db);
//!
//! session.execute(Command::set("balance", "100"))?;
//!
//! session.begin_transaction()?;
//! session.watch("balance")?;
//! session.multi()?;
//! session.execute(Command::decr_by("balance", 30))?;   // Output::Queued
//! let results = session.exec()?;
//! ```

#![warn(missing_docs)]

mod executor;
mod session;


// =============================================================================
// Public API
// =============================================================================

pub use executor::Executor;
pub use session::{Session, TransactionInfo};

pub use watchkv_concurrency::WatchOutcome;
pub use watchkv_core::{Command, CommandResult, Error, Key, NamespaceId, Output, Result, Value};
