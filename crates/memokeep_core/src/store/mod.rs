//! Durable single-slot text store.
//!
//! # See also
//! - `repo` for the capability implementations it wraps.

pub mod durable_store;
