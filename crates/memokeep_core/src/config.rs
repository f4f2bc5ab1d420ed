//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve the database path and storage key.
//! - Open the configured durable store.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - A resolved storage key always passes `validate_storage_key`.

use crate::repo::kv_repo::{RepoError, SqliteKeyValueRepository};
use crate::store::durable_store::{
    validate_storage_key, DurableStore, StoreError, DEFAULT_STORAGE_KEY,
};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "MEMOKEEP_DB_PATH";
pub const STORAGE_KEY_ENV: &str = "MEMOKEEP_STORAGE_KEY";
const DEFAULT_DB_FILE_NAME: &str = "memokeep.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    InvalidStorageKey(StoreError),
    Open(RepoError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStorageKey(err) => write!(f, "{err}"),
            Self::Open(err) => write!(f, "failed to open store: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidStorageKey(err) => Some(err),
            Self::Open(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub storage_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let non_blank = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = non_blank(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);
        let storage_key = non_blank(STORAGE_KEY_ENV).unwrap_or(defaults.storage_key);
        validate_storage_key(&storage_key).map_err(ConfigError::InvalidStorageKey)?;

        Ok(Self {
            db_path,
            storage_key,
        })
    }

    /// Opens the SQLite database and binds the configured key.
    pub fn open_store(&self) -> Result<DurableStore<SqliteKeyValueRepository>, ConfigError> {
        let repo = SqliteKeyValueRepository::open(&self.db_path).map_err(ConfigError::Open)?;
        let store = DurableStore::with_key(repo, self.storage_key.as_str())
            .map_err(ConfigError::InvalidStorageKey)?;
        info!(
            "event=store_open module=config status=ok db_path={} key={}",
            self.db_path.display(),
            self.storage_key
        );
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DB_PATH_ENV, STORAGE_KEY_ENV};
    use crate::store::durable_store::DEFAULT_STORAGE_KEY;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config =
            AppConfig::from_lookup(lookup(&[(DB_PATH_ENV, "  "), (STORAGE_KEY_ENV, "")])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn explicit_values_are_trimmed() {
        let config = AppConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, " /tmp/custom.db "),
            (STORAGE_KEY_ENV, " my_key "),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.storage_key, "my_key");
    }

    #[test]
    fn unsupported_key_characters_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[(STORAGE_KEY_ENV, "my key")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStorageKey(_)));
    }
}
