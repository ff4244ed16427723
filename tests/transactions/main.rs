//! Transaction Integration Tests
//!
//! WATCH/MULTI/EXEC semantics through the public session API, including
//! multi-threaded scenarios against one shared database.

#[path = "../common/mod.rs"]
mod common;

mod command_errors;
mod concurrent;
mod conflict_detection;
mod flush;
mod namespaces;
