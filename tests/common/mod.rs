//! Shared test utilities for the integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::{Arc, Once};

pub use watchkv::{
    Command, CommandErrorPolicy, Database, Error, Key, NamespaceId, Output, Session, Value,
    WatchKvConfig,
};

static INIT_TRACING: Once = Once::new();

/// Install a fmt subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Default namespace
pub const NS: NamespaceId = NamespaceId::DEFAULT;

/// A shared database with default configuration
pub fn shared_db() -> Arc<Database> {
    init_tracing();
    Arc::new(Database::new())
}

/// A shared database running with the given command-error policy
pub fn db_with_policy(policy: CommandErrorPolicy) -> Arc<Database> {
    init_tracing();
    let config = WatchKvConfig {
        command_error_policy: policy.as_str().to_string(),
        ..Default::default()
    };
    match Database::with_config(config) {
        Ok(db) => Arc::new(db),
        Err(e) => panic!("config rejected: {e}"),
    }
}

/// Current value of a key as a UTF-8 string
pub fn read_str(db: &Database, ns: NamespaceId, key: &str) -> Option<String> {
    db.get(ns, &Key::from(key))
        .map(|v| String::from_utf8_lossy(v.value.as_bytes()).into_owned())
}

/// Current value of a key as an integer
pub fn read_int(db: &Database, ns: NamespaceId, key: &str) -> Option<i64> {
    db.get(ns, &Key::from(key)).and_then(|v| v.value.as_i64())
}

/// Current per-key version; absent keys report their namespace's floor
pub fn version_of(db: &Database, ns: NamespaceId, key: &str) -> u64 {
    db.effective_version(ns, &Key::from(key)).version
}
