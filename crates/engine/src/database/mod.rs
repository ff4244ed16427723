//! Database struct and construction
//!
//! This module provides the main Database struct that owns:
//! - The shared KeyValueStore (injectable through `Arc`)
//! - The TransactionCoordinator
//! - The validated configuration
//!
//! ## API surface
//!
//! 1. **Direct operations**: `get`, `set`, `incr_by`, `decr_by`, `delete`,
//!    `db_size`. Each is atomic on its own.
//! 2. **Transactions** (`transactions.rs`): `begin_transaction`, `watch`,
//!    `multi`, `enqueue`, `execute`, `discard`.
//! 3. **Global admin operations** (`admin.rs`): `flush_namespace`, `flush_all`.
//!
//! There is no process-wide instance. Share a `Database` (or just its store)
//! by wrapping it in `Arc`.

pub mod admin;
pub mod config;
mod transactions;

pub use config::{WatchKvConfig, CONFIG_FILE_NAME, DEFAULT_NAMESPACES};

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use watchkv_core::{
    Command, CommandResult, EffectiveVersion, Error, Key, NamespaceId, Output, Result, Value,
    VersionedValue,
};
use watchkv_storage::KeyValueStore;

use crate::coordinator::{TransactionCoordinator, TransactionMetrics};

/// Main database struct
///
/// # Example
///
/// ```text
/// use watchkv_engine::Database;
///
/// let db = Database::new();
/// let mut txn = db.begin_transaction();
/// db.watch(&mut txn, ns, "balance".into())?;
/// db.multi(&mut txn)?;
/// db.enqueue(&mut txn, ns, Command::decr_by("balance", 30))?;
/// let results = db.execute(&mut txn)?;
/// ```
pub struct Database {
    /// Shared ground-truth store
    store: Arc<KeyValueStore>,

    /// Transaction lifecycle, commit protocol and metrics
    coordinator: TransactionCoordinator,

    /// Configuration this database was built with
    config: WatchKvConfig,
}

impl Database {
    /// Create a database with default configuration and an empty store
    pub fn new() -> Self {
        Self {
            store: Arc::new(KeyValueStore::new()),
            coordinator: TransactionCoordinator::new(Default::default()),
            config: WatchKvConfig::default(),
        }
    }

    /// Create a database with an explicit configuration
    ///
    /// # Errors
    /// `Error::Config` if the configuration does not validate.
    pub fn with_config(config: WatchKvConfig) -> Result<Self> {
        Self::with_store(Arc::new(KeyValueStore::new()), config)
    }

    /// Create a database over an existing store
    ///
    /// Several databases may share one store; each keeps its own
    /// coordinator and metrics.
    pub fn with_store(store: Arc<KeyValueStore>, config: WatchKvConfig) -> Result<Self> {
        config.validate()?;
        let policy = config.command_error_policy()?;
        info!(
            target: "watchkv::store",
            namespaces = config.namespaces,
            policy = policy.as_str(),
            "Database created"
        );
        Ok(Self {
            store,
            coordinator: TransactionCoordinator::new(policy),
            config,
        })
    }

    /// Create a database from a `watchkv.toml` file
    ///
    /// The file is created with defaults if it does not exist.
    pub fn open_config<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        WatchKvConfig::write_default_if_missing(path)?;
        Self::with_config(WatchKvConfig::from_file(path)?)
    }

    /// The shared store
    pub fn store(&self) -> &Arc<KeyValueStore> {
        &self.store
    }

    /// The configuration in effect
    pub fn config(&self) -> &WatchKvConfig {
        &self.config
    }

    /// The transaction coordinator
    pub fn coordinator(&self) -> &TransactionCoordinator {
        &self.coordinator
    }

    /// Transaction metrics
    pub fn metrics(&self) -> TransactionMetrics {
        self.coordinator.metrics()
    }

    /// Check a namespace index against the configured limit
    pub fn check_namespace(&self, namespace: NamespaceId) -> Result<()> {
        if namespace.index() < self.config.namespaces {
            Ok(())
        } else {
            Err(Error::InvalidNamespace {
                namespace: namespace.index(),
                limit: self.config.namespaces,
            })
        }
    }

    // ========================================================================
    // Direct operations
    // ========================================================================

    /// Read a key
    pub fn get(&self, namespace: NamespaceId, key: &Key) -> Option<VersionedValue> {
        self.store.get(namespace, key)
    }

    /// Create or overwrite a key, returning its new version
    pub fn set(&self, namespace: NamespaceId, key: impl Into<Key>, value: impl Into<Value>) -> u64 {
        self.store.set(namespace, key.into(), value.into())
    }

    /// Add `delta` to an integer key (absent keys seed at 0)
    pub fn incr_by(&self, namespace: NamespaceId, key: &Key, delta: i64) -> Result<i64> {
        self.store.incr_by(namespace, key, delta)
    }

    /// Subtract `delta` from an integer key (absent keys seed at 0)
    pub fn decr_by(&self, namespace: NamespaceId, key: &Key, delta: i64) -> Result<i64> {
        self.store.decr_by(namespace, key, delta)
    }

    /// Delete a key, returning whether a live key was removed
    pub fn delete(&self, namespace: NamespaceId, key: &Key) -> bool {
        self.store.delete(namespace, key)
    }

    /// Number of live keys in a namespace
    pub fn db_size(&self, namespace: NamespaceId) -> usize {
        self.store.db_size(namespace)
    }

    /// Effective version of a key
    pub fn effective_version(&self, namespace: NamespaceId, key: &Key) -> EffectiveVersion {
        self.store.effective_version(namespace, key)
    }

    /// Run one command outside any transaction
    ///
    /// Flush commands go through the admin path so they are logged the same
    /// way as direct `flush_namespace` / `flush_all` calls.
    pub fn execute_command(&self, namespace: NamespaceId, command: &Command) -> CommandResult {
        match command {
            Command::FlushNamespace => {
                self.flush_namespace(namespace);
                Ok(Output::Unit)
            }
            Command::FlushAll => {
                self.flush_all();
                Ok(Output::Unit)
            }
            other => self.store.apply(namespace, other),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
