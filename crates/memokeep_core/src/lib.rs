//! Core logic for MemoKeep, a two-screen note utility.
//! This crate owns the rules for keeping the draft, the durable value and
//! the navigation snapshot apart.

pub mod channel;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod screen;
pub mod store;

pub use channel::snapshot_channel::{
    snapshot_channel, ChannelError, SnapshotReceiver, SnapshotSender,
};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::snapshot::{NavigationPayload, Snapshot};
pub use repo::kv_repo::{KeyValueRepository, RepoError, RepoResult, SqliteKeyValueRepository};
pub use repo::memory_repo::{FailOn, MemoryKeyValueRepository, RepoOperation};
pub use screen::detail::{DetailController, DetailView};
pub use screen::display::{DisplayLine, LineKind, EMPTY_PLACEHOLDER};
pub use screen::error::{Completion, Notice, ScreenError};
pub use screen::home::{HomeController, HomePhase, HomeView};
pub use screen::lifecycle::TeardownHandle;
pub use store::durable_store::{DurableStore, StoreError, StoreResult, DEFAULT_STORAGE_KEY};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
