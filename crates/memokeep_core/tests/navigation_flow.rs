use memokeep_core::{
    snapshot_channel, Completion, DetailController, DurableStore, FailOn, HomeController,
    MemoryKeyValueRepository, NavigationPayload, Notice, ScreenError, SqliteKeyValueRepository,
    DEFAULT_STORAGE_KEY, EMPTY_PLACEHOLDER,
};

#[tokio::test]
async fn detail_shows_snapshot_and_independently_loaded_value() {
    let store = DurableStore::new(SqliteKeyValueRepository::open_in_memory().unwrap());
    let home = HomeController::new(store.clone());
    home.on_mount().await.unwrap();
    home.on_edit("hello");
    home.on_commit().await.unwrap();

    let (tx, rx) = snapshot_channel();
    home.on_navigate(tx);
    let detail = DetailController::new(store.clone());
    let loaded = detail.open(rx).await.unwrap();

    assert_eq!(loaded, Completion::Applied(Some("hello".to_string())));
    assert_eq!(detail.snapshot().unwrap().as_str(), "hello");
    assert_eq!(detail.durable_mirror().as_deref(), Some("hello"));
    assert!(!detail.is_diverged());
    let view = detail.view();
    assert_eq!(view.snapshot_line.render(), "Not persisted: hello");
    assert_eq!(view.persisted_line.render(), "Persisted: hello");
}

#[tokio::test]
async fn external_clear_makes_detail_diverge_from_snapshot() {
    let repo = MemoryKeyValueRepository::new();
    let store = DurableStore::new(repo.clone());
    let home = HomeController::new(store.clone());
    home.on_edit("hello");
    home.on_commit().await.unwrap();

    // Another session clears the slot directly.
    let other_session = store.clone();
    other_session.clear().await.unwrap();

    let (tx, rx) = snapshot_channel();
    home.on_navigate(tx);
    let detail = DetailController::new(store);
    let loaded = detail.open(rx).await.unwrap();

    assert_eq!(loaded, Completion::Applied(None));
    assert_eq!(detail.snapshot().unwrap().as_str(), "hello");
    assert_eq!(detail.durable_mirror(), None);
    assert!(detail.is_diverged());
    assert_eq!(detail.view().persisted_line.text, EMPTY_PLACEHOLDER);
    assert_eq!(home.durable_mirror().as_deref(), Some("hello"));
}

#[tokio::test]
async fn snapshot_is_a_copy_unaffected_by_later_writes() {
    let store = DurableStore::new(MemoryKeyValueRepository::new());
    let home = HomeController::new(store.clone());
    home.on_edit("first");
    home.on_commit().await.unwrap();

    let (tx, rx) = snapshot_channel();
    home.on_navigate(tx);

    home.on_edit("second");
    home.on_commit().await.unwrap();
    home.on_delete().await.unwrap();

    let payload = rx.recv().await.unwrap();
    assert_eq!(payload.snapshot_text, "first");
    assert!(home.snapshot().is_empty());
}

#[tokio::test]
async fn detail_mount_is_read_only() {
    let repo = MemoryKeyValueRepository::new();
    repo.insert(DEFAULT_STORAGE_KEY, "stored");
    let detail = DetailController::new(DurableStore::new(repo.clone()));

    detail
        .on_mount(NavigationPayload {
            snapshot_text: "snap".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(repo.set_calls(), 0);
    assert_eq!(repo.operations().len(), 1);
    assert_eq!(repo.peek(DEFAULT_STORAGE_KEY).as_deref(), Some("stored"));
}

#[tokio::test]
async fn navigate_before_any_commit_sends_empty_snapshot() {
    let repo = MemoryKeyValueRepository::new();
    repo.insert(DEFAULT_STORAGE_KEY, "older");
    let store = DurableStore::new(repo);
    let home = HomeController::new(store.clone());
    home.on_mount().await.unwrap();

    let (tx, rx) = snapshot_channel();
    home.on_navigate(tx);
    let detail = DetailController::new(store);
    detail.open(rx).await.unwrap();

    let view = detail.view();
    assert_eq!(view.snapshot_line.text, EMPTY_PLACEHOLDER);
    assert_eq!(view.persisted_line.text, "older");
}

#[tokio::test]
async fn dropped_sender_opens_detail_with_empty_snapshot() {
    let detail = DetailController::new(DurableStore::new(MemoryKeyValueRepository::new()));
    let (tx, rx) = snapshot_channel();
    drop(tx);

    detail.open(rx).await.unwrap();
    assert!(detail.snapshot().unwrap().is_empty());
}

#[tokio::test]
async fn detail_load_failure_keeps_snapshot() {
    let repo = MemoryKeyValueRepository::new();
    repo.fail_on(FailOn::Get);
    let detail = DetailController::new(DurableStore::new(repo));

    let err = detail
        .on_mount(NavigationPayload {
            snapshot_text: "snap".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.notice(), Some(Notice::StorageFailure));
    assert_eq!(detail.snapshot().unwrap().as_str(), "snap");
    assert_eq!(detail.durable_mirror(), None);
    assert_eq!(
        detail.on_mount(NavigationPayload::default()).await,
        Err(ScreenError::AlreadyMounted)
    );
}

#[tokio::test]
async fn detail_torn_down_before_load_completes_discards_result() {
    let repo = MemoryKeyValueRepository::new();
    repo.insert(DEFAULT_STORAGE_KEY, "late value");
    let detail = std::sync::Arc::new(DetailController::new(DurableStore::new(repo.clone())));
    let gate = repo.hold();

    let pending = tokio::spawn({
        let detail = std::sync::Arc::clone(&detail);
        async move { detail.on_mount(NavigationPayload::default()).await }
    });
    while repo.operations().is_empty() {
        tokio::task::yield_now().await;
    }

    detail.teardown_handle().teardown();
    gate.add_permits(1);

    assert_eq!(pending.await.unwrap(), Ok(Completion::Discarded));
    assert_eq!(detail.durable_mirror(), None);
}

#[tokio::test]
async fn detail_torn_down_before_mount_keeps_no_state() {
    let repo = MemoryKeyValueRepository::new();
    repo.insert(DEFAULT_STORAGE_KEY, "stored");
    let detail = DetailController::new(DurableStore::new(repo.clone()));
    detail.teardown_handle().teardown();

    let result = detail
        .on_mount(NavigationPayload {
            snapshot_text: "snap".to_string(),
        })
        .await;

    assert_eq!(result, Ok(Completion::Discarded));
    assert_eq!(detail.snapshot(), None);
    assert_eq!(detail.durable_mirror(), None);
    assert!(repo.operations().is_empty());
}
