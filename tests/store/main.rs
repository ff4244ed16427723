//! Store Integration Tests
//!
//! Direct operations, versions and configuration through the public API.

#[path = "../common/mod.rs"]
mod common;

mod config;
