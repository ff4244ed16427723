//! Commit-time validation of the watch set
//!
//! Key rules:
//! - Only watched keys are validated; queued commands add no read set
//! - A watched key conflicts when its effective version differs at commit
//! - Flushes conflict through the epochs folded into the effective version
//!
//! Validation must run under the same store write guard as the apply step.

use watchkv_core::{EffectiveVersion, Error, Key, NamespaceId};
use watchkv_storage::StoreState;

use crate::watch::WatchSet;

/// Types of conflicts that can occur during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// A watched key's effective version moved
    WatchConflict {
        /// Namespace of the watched key
        namespace: NamespaceId,
        /// The watched key
        key: Key,
        /// Effective version recorded by `watch`
        watched_version: EffectiveVersion,
        /// Effective version at validation time
        current_version: EffectiveVersion,
    },
}

impl ConflictType {
    /// The key involved in the conflict
    pub fn key(&self) -> &Key {
        match self {
            ConflictType::WatchConflict { key, .. } => key,
        }
    }
}

/// Result of transaction validation
///
/// Accumulates all conflicts found. A transaction commits only if
/// `is_valid()` returns true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// All conflicts detected during validation
    pub conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// Create a successful validation result (no conflicts)
    pub fn ok() -> Self {
        Self::default()
    }

    /// Check if validation passed (no conflicts)
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Get the number of conflicts
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// Conflicting keys rendered for error reporting
    pub fn conflicting_keys(&self) -> Vec<String> {
        self.conflicts.iter().map(|c| c.key().to_string_lossy()).collect()
    }

    /// Convert a failed validation into the error returned to the caller
    pub fn into_error(self) -> Error {
        Error::Conflict {
            keys: self.conflicting_keys(),
        }
    }
}

/// Compare every watched key against the current store state
pub fn validate_watch_set(watch_set: &WatchSet, state: &StoreState) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for (namespace, key, watched_version) in watch_set.iter() {
        let current_version = state.effective_version(namespace, key);
        if current_version != watched_version {
            result.conflicts.push(ConflictType::WatchConflict {
                namespace,
                key: key.clone(),
                watched_version,
                current_version,
            });
        }
    }

    result
}
