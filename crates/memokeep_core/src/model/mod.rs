//! Value types exchanged between screens.
//!
//! # Invariants
//! - Everything here is owned data; nothing borrows controller state.

pub mod snapshot;
