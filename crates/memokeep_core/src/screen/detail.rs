//! Detail screen controller.
//!
//! # Responsibility
//! - Keep the received snapshot verbatim.
//! - Load the durable value independently of the home screen.
//!
//! # Invariants
//! - Read-only with respect to storage.
//! - Snapshot and durable mirror are never reconciled; they may differ.

use super::display::{DisplayLine, LineKind, DETAIL_PERSISTED_TITLE, SNAPSHOT_TITLE};
use super::error::{Completion, ScreenError};
use super::lifecycle::{ScreenLifecycle, TeardownHandle};
use crate::channel::snapshot_channel::SnapshotReceiver;
use crate::model::snapshot::{NavigationPayload, Snapshot};
use crate::repo::kv_repo::KeyValueRepository;
use crate::store::durable_store::DurableStore;
use log::{debug, info, warn};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct DetailState {
    snapshot: Option<Snapshot>,
    durable_mirror: Option<String>,
}

/// Render model for the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub snapshot_line: DisplayLine,
    pub persisted_line: DisplayLine,
}

pub struct DetailController<R: KeyValueRepository> {
    store: DurableStore<R>,
    lifecycle: ScreenLifecycle,
    state: Mutex<DetailState>,
}

impl<R: KeyValueRepository> DetailController<R> {
    pub fn new(store: DurableStore<R>) -> Self {
        Self {
            store,
            lifecycle: ScreenLifecycle::new(),
            state: Mutex::new(DetailState::default()),
        }
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.lifecycle.teardown_handle()
    }

    /// Waits for the navigation payload, then mounts with it.
    ///
    /// A sender dropped without sending mounts with an empty snapshot.
    pub async fn open(
        &self,
        receiver: SnapshotReceiver,
    ) -> Result<Completion<Option<String>>, ScreenError> {
        let payload = match receiver.recv().await {
            Ok(payload) => payload,
            Err(err) => {
                debug!("event=detail_open module=detail status=no_payload error={err}");
                NavigationPayload::default()
            }
        };
        self.on_mount(payload).await
    }

    /// Stores the snapshot and loads the durable value. Called once.
    ///
    /// The snapshot is kept even when the load fails.
    pub async fn on_mount(
        &self,
        payload: NavigationPayload,
    ) -> Result<Completion<Option<String>>, ScreenError> {
        if !self.lifecycle.is_alive() {
            return Ok(Completion::Discarded);
        }
        let _guard = self.lifecycle.begin_action()?;
        self.lifecycle.mark_mounted()?;
        self.state().snapshot = Some(Snapshot::from(payload));

        let loaded = self.store.load().await;
        if !self.lifecycle.is_alive() {
            debug!("event=detail_mount module=detail status=discarded");
            return Ok(Completion::Discarded);
        }

        match loaded {
            Ok(value) => {
                if let Some(text) = value.as_ref() {
                    self.state().durable_mirror = Some(text.clone());
                }
                info!(
                    "event=detail_mount module=detail status=ok present={}",
                    value.is_some()
                );
                Ok(Completion::Applied(value))
            }
            Err(err) => {
                warn!("event=detail_mount module=detail status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Snapshot received at mount, `None` before mount.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state().snapshot.clone()
    }

    pub fn durable_mirror(&self) -> Option<String> {
        self.state().durable_mirror.clone()
    }

    /// Whether the snapshot and the loaded durable value disagree.
    pub fn is_diverged(&self) -> bool {
        let state = self.state();
        let snapshot = state.snapshot.as_ref().map(Snapshot::as_str).unwrap_or("");
        snapshot != state.durable_mirror.as_deref().unwrap_or("")
    }

    pub fn view(&self) -> DetailView {
        let state = self.state();
        DetailView {
            snapshot_line: DisplayLine::new(
                LineKind::Snapshot,
                SNAPSHOT_TITLE,
                state.snapshot.as_ref().map(Snapshot::as_str),
            ),
            persisted_line: DisplayLine::new(
                LineKind::Persisted,
                DETAIL_PERSISTED_TITLE,
                state.durable_mirror.as_deref(),
            ),
        }
    }

    fn state(&self) -> MutexGuard<'_, DetailState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
