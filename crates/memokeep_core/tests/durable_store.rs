use memokeep_core::{
    AppConfig, DurableStore, FailOn, MemoryKeyValueRepository, RepoOperation,
    SqliteKeyValueRepository, StoreError, DEFAULT_STORAGE_KEY,
};

#[tokio::test]
async fn load_returns_none_before_any_save() {
    let store = DurableStore::new(MemoryKeyValueRepository::new());
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn save_then_load_returns_saved_text() {
    let store = DurableStore::new(SqliteKeyValueRepository::open_in_memory().unwrap());
    for text in ["hello", "  padded  ", "multi\nline", "ünïcødé ✓"] {
        store.save(text).await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some(text));
    }
}

#[tokio::test]
async fn sequential_saves_are_last_write_wins() {
    let store = DurableStore::new(MemoryKeyValueRepository::new());
    store.save("a").await.unwrap();
    store.save("b").await.unwrap();
    assert_eq!(store.load().await.unwrap().as_deref(), Some("b"));
}

#[tokio::test]
async fn clear_is_idempotent() {
    let store = DurableStore::new(SqliteKeyValueRepository::open_in_memory().unwrap());
    store.save("something").await.unwrap();

    store.clear().await.unwrap();
    assert_eq!(store.load().await.unwrap(), None);
    store.clear().await.unwrap();
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn failures_surface_as_storage_unavailable() {
    let repo = MemoryKeyValueRepository::new();
    let store = DurableStore::new(repo.clone());
    repo.set_offline(true);

    assert!(matches!(
        store.load().await,
        Err(StoreError::StorageUnavailable(_))
    ));
    assert!(matches!(
        store.save("x").await,
        Err(StoreError::StorageUnavailable(_))
    ));
    assert!(matches!(
        store.clear().await,
        Err(StoreError::StorageUnavailable(_))
    ));
}

#[tokio::test]
async fn failed_operation_is_not_retried() {
    let repo = MemoryKeyValueRepository::new();
    let store = DurableStore::new(repo.clone());
    repo.fail_on(FailOn::Set);

    assert!(store.save("x").await.is_err());
    assert_eq!(repo.set_calls(), 1);
    assert_eq!(repo.peek(DEFAULT_STORAGE_KEY), None);
}

#[tokio::test]
async fn store_uses_its_single_fixed_key() {
    let repo = MemoryKeyValueRepository::new();
    let store = DurableStore::with_key(repo.clone(), "custom.key").unwrap();
    store.save("v").await.unwrap();

    assert_eq!(
        repo.operations(),
        vec![RepoOperation::Set {
            key: "custom.key".to_string(),
            value: "v".to_string()
        }]
    );
    assert_eq!(repo.peek(DEFAULT_STORAGE_KEY), None);
}

#[tokio::test]
async fn configured_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        db_path: dir.path().join("memokeep.sqlite3"),
        storage_key: DEFAULT_STORAGE_KEY.to_string(),
    };

    config.open_store().unwrap().save("durable").await.unwrap();

    let reopened = config.open_store().unwrap();
    assert_eq!(reopened.load().await.unwrap().as_deref(), Some("durable"));
}
