//! Core types for watchkv
//!
//! This crate defines the foundational types shared by every layer:
//! - NamespaceId: isolated keyspace index
//! - Key / Value: opaque byte strings
//! - EffectiveVersion / VersionedValue: version counters used by WATCH
//! - Command / Output: the instruction set and its results
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod command;
pub mod error;
pub mod types;
pub mod value;
pub mod version;

pub use command::{Command, CommandResult, Output};
pub use error::{Error, Result};
pub use types::{Key, NamespaceId};
pub use value::Value;
pub use version::{EffectiveVersion, VersionedValue};
