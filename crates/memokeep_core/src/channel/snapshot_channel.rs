//! One-shot snapshot channel built on `tokio::sync::oneshot`.
//!
//! # Responsibility
//! - Deliver one `NavigationPayload` by value from home to detail.
//!
//! # Invariants
//! - Sending consumes the sender; a channel carries at most one payload.
//! - The sender never waits for, or receives, an acknowledgment.

use crate::model::snapshot::NavigationPayload;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::sync::oneshot;

/// Channel delivery failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Receiving side was dropped before the payload was sent.
    ReceiverDropped,
    /// Sending side was dropped without sending.
    Closed,
}

impl Display for ChannelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReceiverDropped => write!(f, "snapshot receiver dropped before delivery"),
            Self::Closed => write!(f, "snapshot sender dropped without sending"),
        }
    }
}

impl Error for ChannelError {}

/// Sending half, owned by the home side of a transition.
#[derive(Debug)]
pub struct SnapshotSender {
    tx: oneshot::Sender<NavigationPayload>,
}

/// Receiving half, owned by the detail side of a transition.
#[derive(Debug)]
pub struct SnapshotReceiver {
    rx: oneshot::Receiver<NavigationPayload>,
}

/// Creates a fresh channel for one screen transition.
pub fn snapshot_channel() -> (SnapshotSender, SnapshotReceiver) {
    let (tx, rx) = oneshot::channel();
    (SnapshotSender { tx }, SnapshotReceiver { rx })
}

impl SnapshotSender {
    /// Sends `payload` without waiting for the receiver.
    pub fn send(self, payload: NavigationPayload) -> Result<(), ChannelError> {
        self.tx
            .send(payload)
            .map_err(|_| ChannelError::ReceiverDropped)
    }
}

impl SnapshotReceiver {
    /// Waits for the payload.
    pub async fn recv(self) -> Result<NavigationPayload, ChannelError> {
        self.rx.await.map_err(|_| ChannelError::Closed)
    }
}
