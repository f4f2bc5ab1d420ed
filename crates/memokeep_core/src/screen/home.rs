//! Home screen controller.
//!
//! # Responsibility
//! - Own the draft, mirror the durable value, and produce snapshots on commit.
//! - Hand the current snapshot to the detail screen by value on navigation.
//!
//! # Invariants
//! - Commit validates before any storage call; blank drafts never reach `save`.
//! - Mirrors change only after the storage call succeeds.
//! - A failed commit keeps the draft so the user can retry.
//! - The state lock is never held across an await.

use super::display::{DisplayLine, LineKind, HOME_PERSISTED_TITLE, SNAPSHOT_TITLE};
use super::error::{Completion, Notice, ScreenError};
use super::lifecycle::{ScreenLifecycle, TeardownHandle};
use crate::channel::snapshot_channel::SnapshotSender;
use crate::model::snapshot::Snapshot;
use crate::repo::kv_repo::KeyValueRepository;
use crate::store::durable_store::DurableStore;
use log::{debug, info, warn};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Resting state of the home screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HomePhase {
    /// Draft is empty.
    #[default]
    Idle,
    /// Draft holds uncommitted text.
    Editing,
    /// Last action was a successful commit and the draft was cleared.
    Committed,
}

#[derive(Debug, Default)]
struct HomeState {
    draft: String,
    durable_mirror: Option<String>,
    snapshot: Snapshot,
    phase: HomePhase,
}

/// Render model for the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub draft: String,
    pub snapshot_line: DisplayLine,
    pub persisted_line: DisplayLine,
    /// False while a storage call is outstanding.
    pub actions_enabled: bool,
}

pub struct HomeController<R: KeyValueRepository> {
    store: DurableStore<R>,
    lifecycle: ScreenLifecycle,
    state: Mutex<HomeState>,
}

impl<R: KeyValueRepository> HomeController<R> {
    pub fn new(store: DurableStore<R>) -> Self {
        Self {
            store,
            lifecycle: ScreenLifecycle::new(),
            state: Mutex::new(HomeState::default()),
        }
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.lifecycle.teardown_handle()
    }

    /// Loads the durable value into the mirror. Called once by the runtime.
    ///
    /// # Errors
    /// - `AlreadyMounted` on a second call.
    /// - `StorageUnavailable` when the load fails; the mirror stays absent.
    pub async fn on_mount(&self) -> Result<Completion<Option<String>>, ScreenError> {
        if !self.lifecycle.is_alive() {
            return Ok(Completion::Discarded);
        }
        let _guard = self.lifecycle.begin_action()?;
        self.lifecycle.mark_mounted()?;

        let loaded = self.store.load().await;
        if !self.lifecycle.is_alive() {
            debug!("event=home_mount module=home status=discarded");
            return Ok(Completion::Discarded);
        }

        match loaded {
            Ok(value) => {
                if let Some(text) = value.as_ref() {
                    self.state().durable_mirror = Some(text.clone());
                }
                info!(
                    "event=home_mount module=home status=ok present={}",
                    value.is_some()
                );
                Ok(Completion::Applied(value))
            }
            Err(err) => {
                warn!("event=home_mount module=home status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Replaces the draft. No validation happens here.
    pub fn on_edit(&self, text: impl Into<String>) {
        let mut state = self.state();
        state.draft = text.into();
        state.phase = if state.draft.is_empty() {
            HomePhase::Idle
        } else {
            HomePhase::Editing
        };
    }

    /// Validates the draft and writes it through the durable store.
    ///
    /// On success the mirror and snapshot take the committed text and the
    /// draft is cleared; the new snapshot is returned.
    ///
    /// # Errors
    /// - `Validation` for an empty or whitespace-only draft (no storage call).
    /// - `StorageUnavailable` when the write fails; all state is kept.
    /// - `ActionPending` while another storage call is outstanding.
    pub async fn on_commit(&self) -> Result<Completion<Snapshot>, ScreenError> {
        if !self.lifecycle.is_alive() {
            return Ok(Completion::Discarded);
        }
        let _guard = self.lifecycle.begin_action()?;

        let draft = self.state().draft.clone();
        if draft.trim().is_empty() {
            info!("event=home_commit module=home status=rejected error_code=empty_draft");
            return Err(ScreenError::Validation);
        }

        let saved = self.store.save(&draft).await;
        if !self.lifecycle.is_alive() {
            debug!("event=home_commit module=home status=discarded");
            return Ok(Completion::Discarded);
        }
        if let Err(err) = saved {
            warn!("event=home_commit module=home status=error error={err}");
            return Err(err.into());
        }

        let snapshot = Snapshot::new(draft.clone());
        let mut state = self.state();
        state.durable_mirror = Some(draft);
        state.snapshot = snapshot.clone();
        state.draft.clear();
        state.phase = HomePhase::Committed;
        info!(
            "event=home_commit module=home status=ok chars={}",
            snapshot.as_str().chars().count()
        );
        Ok(Completion::Applied(snapshot))
    }

    /// Clears the durable slot and resets the mirror and snapshot.
    ///
    /// Returns the confirmation notice to show on success.
    pub async fn on_delete(&self) -> Result<Completion<Notice>, ScreenError> {
        if !self.lifecycle.is_alive() {
            return Ok(Completion::Discarded);
        }
        let _guard = self.lifecycle.begin_action()?;

        let cleared = self.store.clear().await;
        if !self.lifecycle.is_alive() {
            debug!("event=home_delete module=home status=discarded");
            return Ok(Completion::Discarded);
        }
        if let Err(err) = cleared {
            warn!("event=home_delete module=home status=error error={err}");
            return Err(err.into());
        }

        let mut state = self.state();
        state.durable_mirror = None;
        state.snapshot = Snapshot::default();
        state.phase = if state.draft.is_empty() {
            HomePhase::Idle
        } else {
            HomePhase::Editing
        };
        info!("event=home_delete module=home status=ok");
        Ok(Completion::Applied(Notice::Deleted))
    }

    /// Sends the current snapshot, by value, to the detail screen.
    ///
    /// Fire-and-forget: an undelivered payload is only logged.
    pub fn on_navigate(&self, sender: SnapshotSender) {
        let payload = self.state().snapshot.to_payload();
        match sender.send(payload) {
            Ok(()) => debug!("event=home_navigate module=home status=ok"),
            Err(err) => debug!("event=home_navigate module=home status=undelivered error={err}"),
        }
    }

    pub fn draft(&self) -> String {
        self.state().draft.clone()
    }

    pub fn durable_mirror(&self) -> Option<String> {
        self.state().durable_mirror.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state().snapshot.clone()
    }

    pub fn phase(&self) -> HomePhase {
        self.state().phase
    }

    /// Whether commit/delete can be triggered right now.
    pub fn is_action_enabled(&self) -> bool {
        self.lifecycle.is_alive() && self.lifecycle.is_idle()
    }

    pub fn view(&self) -> HomeView {
        let actions_enabled = self.is_action_enabled();
        let state = self.state();
        HomeView {
            draft: state.draft.clone(),
            snapshot_line: DisplayLine::new(
                LineKind::Snapshot,
                SNAPSHOT_TITLE,
                Some(state.snapshot.as_str()),
            ),
            persisted_line: DisplayLine::new(
                LineKind::Persisted,
                HOME_PERSISTED_TITLE,
                state.durable_mirror.as_deref(),
            ),
            actions_enabled,
        }
    }

    fn state(&self) -> MutexGuard<'_, HomeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
