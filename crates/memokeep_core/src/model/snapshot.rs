//! Committed-text snapshot and the navigation payload that carries it.
//!
//! # Responsibility
//! - Hold an immutable copy of text as it was at commit time.
//! - Define the structured payload sent from the home screen to detail.
//!
//! # Invariants
//! - A `Snapshot` owns its text; later writes to storage never reach it.
//! - The payload wire field is `snapshotText`.

use serde::{Deserialize, Serialize};

/// Immutable copy of committed text.
///
/// Empty when nothing has been committed yet or after a delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds the payload carried across the screen transition.
    pub fn to_payload(&self) -> NavigationPayload {
        NavigationPayload {
            snapshot_text: self.0.clone(),
        }
    }
}

impl From<NavigationPayload> for Snapshot {
    fn from(value: NavigationPayload) -> Self {
        Self(value.snapshot_text)
    }
}

/// One-shot payload sent on navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationPayload {
    /// Snapshot text; empty when nothing was committed.
    #[serde(default)]
    pub snapshot_text: String,
}
