//! Single-slot durable text store over a key-value capability.
//!
//! # Responsibility
//! - Bind one fixed key to a repository and expose load/save/clear.
//! - Collapse every capability failure into `StorageUnavailable`.
//!
//! # Invariants
//! - The slot holds at most one string; `save` is last-write-wins.
//! - `clear` is idempotent.
//! - Failures are never retried here.
//! - Log events carry lengths and durations only, never the text itself.

use crate::repo::kv_repo::{KeyValueRepository, RepoError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Key used when no key is configured.
pub const DEFAULT_STORAGE_KEY: &str = "saved_text";
const MAX_STORAGE_KEY_CHARS: usize = 128;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a durable store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Underlying medium could not complete the operation.
    StorageUnavailable(String),
    /// Configured key is empty, too long, or has unsupported characters.
    InvalidKey(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::InvalidKey(key) => write!(
                f,
                "invalid storage key `{key}`; expected 1-{MAX_STORAGE_KEY_CHARS} chars of [A-Za-z0-9._-]"
            ),
        }
    }
}

impl Error for StoreError {}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::StorageUnavailable(value.to_string())
    }
}

/// Checks a storage key against the characters secure key-value media accept.
pub fn validate_storage_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key.chars().count() <= MAX_STORAGE_KEY_CHARS
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Durable text slot shared by every screen (and any external actor).
pub struct DurableStore<R: KeyValueRepository> {
    repo: Arc<R>,
    key: Arc<str>,
}

impl<R: KeyValueRepository> Clone for DurableStore<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            key: Arc::clone(&self.key),
        }
    }
}

impl<R: KeyValueRepository> DurableStore<R> {
    /// Binds `repo` to [`DEFAULT_STORAGE_KEY`].
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
            key: Arc::from(DEFAULT_STORAGE_KEY),
        }
    }

    /// Binds `repo` to a caller-chosen key.
    ///
    /// # Errors
    /// - Returns `InvalidKey` when `key` fails [`validate_storage_key`].
    pub fn with_key(repo: R, key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();
        validate_storage_key(&key)?;
        Ok(Self {
            repo: Arc::new(repo),
            key: Arc::from(key),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Returns the stored text, or `None` when never set or cleared.
    pub async fn load(&self) -> StoreResult<Option<String>> {
        let started_at = Instant::now();
        match self.repo.get(&self.key).await {
            Ok(value) => {
                debug!(
                    "event=store_load module=store status=ok present={} duration_ms={}",
                    value.is_some(),
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => Err(unavailable("store_load", started_at, err)),
        }
    }

    /// Overwrites the slot with `value`.
    pub async fn save(&self, value: &str) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.repo.set(&self.key, value).await {
            Ok(()) => {
                debug!(
                    "event=store_save module=store status=ok chars={} duration_ms={}",
                    value.chars().count(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => Err(unavailable("store_save", started_at, err)),
        }
    }

    /// Removes the slot. Clearing an absent slot succeeds.
    pub async fn clear(&self) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.repo.delete(&self.key).await {
            Ok(()) => {
                debug!(
                    "event=store_clear module=store status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => Err(unavailable("store_clear", started_at, err)),
        }
    }
}

fn unavailable(event: &str, started_at: Instant, err: RepoError) -> StoreError {
    warn!(
        "event={} module=store status=error error_code=storage_unavailable duration_ms={} error={}",
        event,
        started_at.elapsed().as_millis(),
        err
    );
    err.into()
}

#[cfg(test)]
mod tests {
    use super::{validate_storage_key, StoreError};

    #[test]
    fn storage_key_accepts_secure_store_charset() {
        assert!(validate_storage_key("saved_text").is_ok());
        assert!(validate_storage_key("notes.v2-main").is_ok());
    }

    #[test]
    fn storage_key_rejects_blank_spaces_and_overlong() {
        assert!(matches!(
            validate_storage_key(""),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(validate_storage_key("my text").is_err());
        assert!(validate_storage_key(&"k".repeat(129)).is_err());
    }
}
