//! Screen controllers and their shared lifecycle plumbing.
//!
//! # Responsibility
//! - Own per-screen state (draft, durable mirror, snapshot).
//! - Turn storage outcomes into user-visible notices at the screen boundary.
//!
//! # Invariants
//! - Controllers share no in-memory state; they meet only through the
//!   durable store and the snapshot channel.
//! - At most one storage call per controller is outstanding at a time.
//! - Results arriving after teardown are discarded.

pub mod detail;
pub mod display;
pub mod error;
pub mod home;
pub mod lifecycle;
