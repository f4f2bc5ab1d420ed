//! Mount/teardown tracking and action serialization for one screen.
//!
//! # Invariants
//! - `mark_mounted` succeeds exactly once.
//! - At most one `ActionGuard` exists per lifecycle at a time.
//! - Teardown is one-way.

use super::error::ScreenError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle flags owned by a controller.
#[derive(Debug)]
pub struct ScreenLifecycle {
    alive: Arc<AtomicBool>,
    mounted: AtomicBool,
    in_flight: AtomicBool,
}

impl Default for ScreenLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenLifecycle {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
            mounted: AtomicBool::new(false),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Handle the owning runtime uses to tear the view down.
    pub fn teardown_handle(&self) -> TeardownHandle {
        TeardownHandle {
            alive: Arc::clone(&self.alive),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Whether no storage call is outstanding.
    pub fn is_idle(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    pub(crate) fn mark_mounted(&self) -> Result<(), ScreenError> {
        self.mounted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| ScreenError::AlreadyMounted)
    }

    /// Claims the single storage-call slot until the guard drops.
    pub(crate) fn begin_action(&self) -> Result<ActionGuard<'_>, ScreenError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ActionGuard {
                in_flight: &self.in_flight,
            })
            .map_err(|_| ScreenError::ActionPending)
    }
}

/// Releases the storage-call slot on drop.
#[derive(Debug)]
pub(crate) struct ActionGuard<'a> {
    in_flight: &'a AtomicBool,
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// Cloneable teardown switch held by the owning runtime.
#[derive(Debug, Clone)]
pub struct TeardownHandle {
    alive: Arc<AtomicBool>,
}

impl TeardownHandle {
    pub fn teardown(&self) {
        self.alive.store(false, Ordering::Release);
    }

    pub fn is_torn_down(&self) -> bool {
        !self.alive.load(Ordering::Acquire)
    }
}
