//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one function per user action on the home and detail screens.
//! - Convert screen errors into notice text; nothing propagates past here.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Opening a screen replaces (and tears down) the previous instance.
//! - The session lock is never held while a storage call runs.

use log::warn;
use memokeep_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    snapshot_channel, AppConfig, Completion, DetailController, DurableStore, HomeController,
    Notice, ScreenError, SqliteKeyValueRepository,
};
use once_cell::sync::{Lazy, OnceCell};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Runtime;

type Store = DurableStore<SqliteKeyValueRepository>;

static RUNTIME: OnceCell<Runtime> = OnceCell::new();
static STORE: OnceCell<Store> = OnceCell::new();
static SESSION: Lazy<Mutex<Session>> = Lazy::new(|| Mutex::new(Session::default()));

#[derive(Default)]
struct Session {
    home: Option<Arc<HomeController<SqliteKeyValueRepository>>>,
    detail: Option<Arc<DetailController<SqliteKeyValueRepository>>>,
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Screen state plus an optional notice, returned by every screen call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenResponse {
    /// Whether the triggering action succeeded.
    pub ok: bool,
    /// User-visible notice text, if one should be shown.
    pub notice: Option<String>,
    /// Whether the notice must be dismissed before continuing.
    pub notice_blocking: bool,
    /// Current draft (home only; empty on detail).
    pub draft: String,
    /// Rendered snapshot line.
    pub snapshot_line: String,
    /// Rendered durable-value line.
    pub persisted_line: String,
    /// False while a storage call is outstanding.
    pub actions_enabled: bool,
}

impl ScreenResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            notice: Some(message.into()),
            notice_blocking: false,
            draft: String::new(),
            snapshot_line: String::new(),
            persisted_line: String::new(),
            actions_enabled: true,
        }
    }

    fn with_notice(mut self, notice: Option<Notice>) -> Self {
        if let Some(notice) = notice {
            self.notice = Some(notice.message().to_string());
            self.notice_blocking = notice.is_blocking();
        }
        self
    }

    fn from_home(home: &HomeController<SqliteKeyValueRepository>, ok: bool) -> Self {
        let view = home.view();
        Self {
            ok,
            notice: None,
            notice_blocking: false,
            draft: view.draft,
            snapshot_line: view.snapshot_line.render(),
            persisted_line: view.persisted_line.render(),
            actions_enabled: view.actions_enabled,
        }
    }

    fn from_detail(detail: &DetailController<SqliteKeyValueRepository>, ok: bool) -> Self {
        let view = detail.view();
        Self {
            ok,
            notice: None,
            notice_blocking: false,
            draft: String::new(),
            snapshot_line: view.snapshot_line.render(),
            persisted_line: view.persisted_line.render(),
            actions_enabled: false,
        }
    }
}

/// Mounts a fresh home screen and loads the durable value.
#[flutter_rust_bridge::frb(sync)]
pub fn home_open() -> ScreenResponse {
    let (runtime, store) = match runtime_and_store() {
        Ok(pair) => pair,
        Err(message) => return ScreenResponse::failure(format!("home_open failed: {message}")),
    };

    let home = Arc::new(HomeController::new(store.clone()));
    if let Some(previous) = session().home.replace(Arc::clone(&home)) {
        previous.teardown_handle().teardown();
    }

    let result = runtime.block_on(home.on_mount());
    home_response(&home, result.map(|_| None))
}

/// Replaces the home draft. No validation happens here.
#[flutter_rust_bridge::frb(sync)]
pub fn home_edit(text: String) -> ScreenResponse {
    match current_home() {
        Some(home) => {
            home.on_edit(text);
            ScreenResponse::from_home(&home, true)
        }
        None => ScreenResponse::failure("home screen is not open"),
    }
}

/// Commits the draft to durable storage.
#[flutter_rust_bridge::frb(sync)]
pub fn home_commit() -> ScreenResponse {
    let (runtime, home) = match runtime_and_home() {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    let result = runtime.block_on(home.on_commit());
    home_response(&home, result.map(|_| None))
}

/// Clears durable storage and the home mirrors.
#[flutter_rust_bridge::frb(sync)]
pub fn home_delete() -> ScreenResponse {
    let (runtime, home) = match runtime_and_home() {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    let result = runtime.block_on(home.on_delete());
    home_response(&home, result.map(Completion::applied))
}

/// Navigates to a fresh detail screen carrying the home snapshot.
#[flutter_rust_bridge::frb(sync)]
pub fn detail_open() -> ScreenResponse {
    let (runtime, home) = match runtime_and_home() {
        Ok(pair) => pair,
        Err(response) => return response,
    };
    let store = match STORE.get() {
        Some(store) => store.clone(),
        None => return ScreenResponse::failure("store is not open"),
    };

    let (tx, rx) = snapshot_channel();
    home.on_navigate(tx);
    let detail = Arc::new(DetailController::new(store));
    if let Some(previous) = session().detail.replace(Arc::clone(&detail)) {
        previous.teardown_handle().teardown();
    }

    match runtime.block_on(detail.open(rx)) {
        Ok(_) => ScreenResponse::from_detail(&detail, true),
        Err(err) => ScreenResponse::from_detail(&detail, false).with_notice(err.notice()),
    }
}

/// Tears down the detail screen; late results are discarded.
#[flutter_rust_bridge::frb(sync)]
pub fn detail_close() {
    if let Some(detail) = session().detail.take() {
        detail.teardown_handle().teardown();
    }
}

/// Tears down the home screen; late results are discarded.
#[flutter_rust_bridge::frb(sync)]
pub fn home_close() {
    if let Some(home) = session().home.take() {
        home.teardown_handle().teardown();
    }
}

fn home_response(
    home: &HomeController<SqliteKeyValueRepository>,
    result: Result<Option<Notice>, ScreenError>,
) -> ScreenResponse {
    match result {
        Ok(notice) => ScreenResponse::from_home(home, true).with_notice(notice),
        Err(err) => {
            warn!("event=ffi_action module=ffi status=error error={err}");
            ScreenResponse::from_home(home, false).with_notice(err.notice())
        }
    }
}

fn session() -> MutexGuard<'static, Session> {
    SESSION.lock().unwrap_or_else(PoisonError::into_inner)
}

fn current_home() -> Option<Arc<HomeController<SqliteKeyValueRepository>>> {
    session().home.clone()
}

fn runtime() -> Result<&'static Runtime, String> {
    RUNTIME.get_or_try_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("memokeep-ffi")
            .build()
            .map_err(|err| format!("runtime init failed: {err}"))
    })
}

fn runtime_and_store() -> Result<(&'static Runtime, &'static Store), String> {
    let runtime = runtime()?;
    let store = STORE.get_or_try_init(|| {
        let config = AppConfig::from_env().map_err(|err| err.to_string())?;
        config.open_store().map_err(|err| err.to_string())
    })?;
    Ok((runtime, store))
}

fn runtime_and_home() -> Result<
    (
        &'static Runtime,
        Arc<HomeController<SqliteKeyValueRepository>>,
    ),
    ScreenResponse,
> {
    let runtime = runtime().map_err(ScreenResponse::failure)?;
    let home = current_home().ok_or_else(|| ScreenResponse::failure("home screen is not open"))?;
    Ok((runtime, home))
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, detail_close, detail_open, home_close, home_commit, home_delete, home_edit,
        home_open, init_logging, ping,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn two_screen_flow_reports_notices_and_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("MEMOKEEP_DB_PATH", dir.path().join("ffi.sqlite3"));

        let opened = home_open();
        assert!(opened.ok, "{:?}", opened.notice);

        home_edit("   ".to_string());
        let rejected = home_commit();
        assert!(!rejected.ok);
        assert_eq!(rejected.notice.as_deref(), Some("Please enter some text."));
        assert!(rejected.notice_blocking);

        home_edit("hello".to_string());
        let committed = home_commit();
        assert!(committed.ok);
        assert_eq!(committed.draft, "");
        assert_eq!(committed.snapshot_line, "Not persisted: hello");
        assert_eq!(committed.persisted_line, "Persisted text: hello");

        let detail = detail_open();
        assert!(detail.ok);
        assert_eq!(detail.snapshot_line, "Not persisted: hello");
        assert_eq!(detail.persisted_line, "Persisted: hello");
        detail_close();

        let deleted = home_delete();
        assert!(deleted.ok);
        assert_eq!(deleted.notice.as_deref(), Some("Text removed from storage."));
        assert_eq!(deleted.persisted_line, "Persisted text: No text saved");

        home_close();
        assert!(!home_commit().ok);
    }
}
