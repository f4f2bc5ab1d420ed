//! Key-value storage capability and its implementations.
//!
//! # Responsibility
//! - Define the async get/set/delete contract the durable text slot relies on.
//! - Isolate SQLite details from store and screen orchestration.
//!
//! # Invariants
//! - `set` overwrites unconditionally (last-write-wins).
//! - `delete` on a missing key succeeds without observable change.

pub mod kv_repo;
pub mod memory_repo;
