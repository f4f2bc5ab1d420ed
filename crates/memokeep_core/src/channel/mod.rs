//! Screen-transition message passing.
//!
//! # Invariants
//! - Home -> detail only; there is no reverse channel.

pub mod snapshot_channel;
