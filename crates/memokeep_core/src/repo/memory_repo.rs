//! In-memory key-value repository for tests and previews.
//!
//! # Design
//!
//! State lives behind `Arc<Mutex<...>>` so every clone observes the same
//! entries. Failures can be injected per operation or for the whole medium,
//! and every call is recorded so callers can assert which operations ran.
//! A gate can suspend calls until released, which lets tests observe a call
//! while it is outstanding.

use super::kv_repo::{checked_key, KeyValueRepository, RepoError, RepoResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Semaphore;

/// Operation that should fail while configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Get,
    Set,
    Delete,
}

/// Recorded call, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOperation {
    Get { key: String },
    Set { key: String, value: String },
    Delete { key: String },
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    fail_on: Option<FailOn>,
    offline: bool,
    gate: Option<Arc<Semaphore>>,
    operations: Vec<RepoOperation>,
}

/// Shared in-memory repository.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueRepository {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryKeyValueRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a value without recording an operation.
    pub fn insert(&self, key: &str, value: &str) {
        self.lock()
            .entries
            .insert(key.to_string(), value.to_string());
    }

    /// Reads a value without recording an operation.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().entries.get(key).cloned()
    }

    /// Makes every subsequent call of `op` fail until cleared.
    pub fn fail_on(&self, op: FailOn) {
        self.lock().fail_on = Some(op);
    }

    pub fn clear_failure(&self) {
        self.lock().fail_on = None;
    }

    /// Simulates an unreachable medium for every operation.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Suspends every subsequent call until a permit is added to the
    /// returned semaphore (one permit releases one call).
    pub fn hold(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.lock().gate = Some(Arc::clone(&gate));
        gate
    }

    /// Removes the gate; calls already waiting stay suspended on it.
    pub fn release_hold(&self) {
        self.lock().gate = None;
    }

    pub fn operations(&self) -> Vec<RepoOperation> {
        self.lock().operations.clone()
    }

    /// Number of recorded `set` calls.
    pub fn set_calls(&self) -> usize {
        self.lock()
            .operations
            .iter()
            .filter(|op| matches!(op, RepoOperation::Set { .. }))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn enter(&self, op: RepoOperation, kind: FailOn) -> RepoResult<()> {
        let gate = {
            let mut inner = self.lock();
            inner.operations.push(op);
            inner.gate.clone()
        };

        if let Some(gate) = gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| RepoError::Unavailable("memory gate closed".to_string()))?;
            permit.forget();
        }

        let inner = self.lock();
        if inner.offline {
            return Err(RepoError::Unavailable("memory store offline".to_string()));
        }
        if inner.fail_on == Some(kind) {
            return Err(RepoError::Unavailable(format!(
                "injected failure on {kind:?}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueRepository for MemoryKeyValueRepository {
    async fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let key = checked_key(key)?;
        self.enter(RepoOperation::Get { key: key.clone() }, FailOn::Get)
            .await?;
        Ok(self.lock().entries.get(&key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = checked_key(key)?;
        self.enter(
            RepoOperation::Set {
                key: key.clone(),
                value: value.to_string(),
            },
            FailOn::Set,
        )
        .await?;
        self.lock().entries.insert(key, value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> RepoResult<()> {
        let key = checked_key(key)?;
        self.enter(RepoOperation::Delete { key: key.clone() }, FailOn::Delete)
            .await?;
        self.lock().entries.remove(&key);
        Ok(())
    }
}
