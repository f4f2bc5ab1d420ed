//! Key-value repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Expose the external storage capability as an async trait.
//! - Run blocking SQLite work off the async executor.
//!
//! # Invariants
//! - Each operation is atomic from the caller's perspective.
//! - Keys are validated before any SQL is issued.

use crate::db::{open_db, open_db_in_memory, DbError};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure raised by a storage capability implementation.
#[derive(Debug)]
pub enum RepoError {
    /// SQLite transport or schema failure.
    Db(DbError),
    /// Medium could not be reached (worker failure, offline, injected fault).
    Unavailable(String),
    /// Key is empty after trimming.
    InvalidKey,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::InvalidKey => write!(f, "storage key cannot be empty"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) | Self::InvalidKey => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Async key-value capability over plain string values.
#[async_trait]
pub trait KeyValueRepository: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> RepoResult<Option<String>>;
    /// Overwrites the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes `key`; succeeds when the key is already absent.
    async fn delete(&self, key: &str) -> RepoResult<()>;
}

/// SQLite-backed key-value repository.
///
/// Clones share one connection; calls are serialized by the connection lock.
#[derive(Debug, Clone)]
pub struct SqliteKeyValueRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKeyValueRepository {
    /// Wraps a migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    async fn with_conn<T, F>(&self, op: F) -> RepoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> RepoResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| RepoError::Unavailable("connection lock poisoned".to_string()))?;
            op(&guard)
        })
        .await
        .map_err(|err| RepoError::Unavailable(format!("storage worker failed: {err}")))?
    }
}

#[async_trait]
impl KeyValueRepository for SqliteKeyValueRepository {
    async fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let key = checked_key(key)?;
        self.with_conn(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_entries WHERE key = ?1;",
                    [key.as_str()],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = checked_key(key)?;
        let value = value.to_owned();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> RepoResult<()> {
        let key = checked_key(key)?;
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM kv_entries WHERE key = ?1;", [key.as_str()])?;
            Ok(())
        })
        .await
    }
}

pub(crate) fn checked_key(key: &str) -> RepoResult<String> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidKey);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{checked_key, KeyValueRepository, RepoError, SqliteKeyValueRepository};

    #[test]
    fn checked_key_trims_and_rejects_blank() {
        assert_eq!(checked_key("  note ").expect("key should pass"), "note");
        assert!(matches!(checked_key("   "), Err(RepoError::InvalidKey)));
    }

    #[tokio::test]
    async fn set_overwrites_and_delete_is_idempotent() {
        let repo = SqliteKeyValueRepository::open_in_memory().unwrap();

        repo.set("slot", "first").await.unwrap();
        repo.set("slot", "second").await.unwrap();
        assert_eq!(repo.get("slot").await.unwrap().as_deref(), Some("second"));

        repo.delete("slot").await.unwrap();
        repo.delete("slot").await.unwrap();
        assert_eq!(repo.get("slot").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_are_isolated() {
        let repo = SqliteKeyValueRepository::open_in_memory().unwrap();
        repo.set("a", "one").await.unwrap();
        repo.set("b", "two").await.unwrap();
        repo.delete("a").await.unwrap();

        assert_eq!(repo.get("a").await.unwrap(), None);
        assert_eq!(repo.get("b").await.unwrap().as_deref(), Some("two"));
    }
}
