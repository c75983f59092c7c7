//! Integration tests wiring the TUI application state to the sync layer.
//!
//! Drives [`App`] with key events, forwards the resulting commands to a
//! real sync task over a real in-process backend, and folds the emitted
//! events back into the app, mirroring the main loop without a terminal.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use doitbro::app::{App, PanelFocus};
use doitbro::sync::{self, SyncCommand, SyncConfig, SyncEvent};
use doitbro_backend::{MemoryAuth, MemoryStore};
use doitbro_store::identity::Identity;

struct Harness {
    app: App,
    cmd_tx: mpsc::Sender<SyncCommand>,
    evt_rx: mpsc::Receiver<SyncEvent>,
}

impl Harness {
    fn new() -> (Self, Arc<MemoryStore>) {
        let provider = Arc::new(MemoryAuth::new(Identity::new("alice", "Alice")));
        let store = Arc::new(MemoryStore::new());
        let (cmd_tx, evt_rx) =
            sync::spawn_sync(provider, Arc::clone(&store), SyncConfig::default());
        (
            Self {
                app: App::new(),
                cmd_tx,
                evt_rx,
            },
            store,
        )
    }

    /// One key press, forwarding any resulting command like the main loop.
    fn press(&mut self, code: KeyCode) {
        self.press_with(code, KeyModifiers::NONE);
    }

    fn press_with(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if let Some(cmd) = self.app.handle_key_event(KeyEvent::new(code, modifiers)) {
            self.cmd_tx.try_send(cmd).expect("sync channel full");
        }
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    /// Apply sync events until `predicate` holds on the app state.
    async fn settle(&mut self, predicate: impl Fn(&App) -> bool) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while tokio::time::Instant::now() < deadline {
            if predicate(&self.app) {
                return;
            }
            match tokio::time::timeout(Duration::from_secs(2), self.evt_rx.recv()).await {
                Ok(Some(event)) => self.app.apply_event(event),
                Ok(None) => panic!("sync channel closed"),
                Err(_) => break,
            }
        }
        panic!("app state never settled");
    }

    async fn sign_in(&mut self) {
        self.press_with(KeyCode::Char('g'), KeyModifiers::CONTROL);
        self.settle(|app| app.session.is_authenticated()).await;
        // Consume the initial empty snapshot so tests start from a known
        // mirror.
        self.settle(|app| app.tasks.is_empty()).await;
    }
}

#[tokio::test]
async fn sign_in_key_authenticates_the_app() {
    let (mut h, _store) = Harness::new();
    assert!(!h.app.session.is_authenticated());

    h.sign_in().await;
    assert_eq!(h.app.session.display_name(), Some("Alice"));
}

#[tokio::test]
async fn typed_task_round_trips_into_the_visible_list() {
    let (mut h, _store) = Harness::new();
    h.sign_in().await;

    h.type_text("buy milk");
    h.press(KeyCode::Enter);

    // Optimistic clear: the input empties before the snapshot arrives.
    assert!(h.app.input.is_empty());

    h.settle(|app| app.tasks.len() == 1).await;
    let visible = h.app.visible_tasks();
    assert_eq!(visible[0].text, "buy milk");
}

#[tokio::test]
async fn toggle_and_delete_flow_through_the_list_panel() {
    let (mut h, _store) = Harness::new();
    h.sign_in().await;

    h.type_text("task");
    h.press(KeyCode::Enter);
    h.settle(|app| app.tasks.len() == 1).await;

    h.press(KeyCode::Tab);
    assert_eq!(h.app.focus, PanelFocus::List);

    h.press(KeyCode::Char(' '));
    h.settle(|app| app.tasks.first().is_some_and(|t| t.done)).await;

    h.press(KeyCode::Char('p'));
    h.settle(|app| app.tasks.first().is_some_and(|t| t.pinned))
        .await;

    h.press(KeyCode::Char('d'));
    h.settle(|app| app.tasks.is_empty()).await;
}

#[tokio::test]
async fn anonymous_submit_never_reaches_the_store() {
    let (mut h, store) = Harness::new();

    h.type_text("orphan");
    h.press(KeyCode::Enter);

    // Rejected locally: input kept, status set, nothing dispatched.
    assert_eq!(h.app.input, "orphan");
    assert!(h.app.status.is_some());
    assert!(store.is_empty());
}

#[tokio::test]
async fn sign_out_key_clears_the_app() {
    let (mut h, _store) = Harness::new();
    h.sign_in().await;

    h.type_text("task");
    h.press(KeyCode::Enter);
    h.settle(|app| app.tasks.len() == 1).await;

    h.type_text("half-typed");
    h.press_with(KeyCode::Char('o'), KeyModifiers::CONTROL);
    h.settle(|app| !app.session.is_authenticated()).await;

    assert!(h.app.tasks.is_empty());
    assert!(h.app.input.is_empty());
    assert!(h.app.visible_tasks().is_empty());
}

#[tokio::test]
async fn failed_write_surfaces_in_the_status_bar() {
    let (mut h, store) = Harness::new();
    h.sign_in().await;

    store.deny_writes(true);
    h.type_text("rejected");
    h.press(KeyCode::Enter);

    h.settle(|app| app.status.is_some()).await;
    let status = h.app.status.clone().unwrap();
    assert!(status.contains("permission denied"), "got: {status}");
    // The mirror is unchanged.
    assert!(h.app.tasks.is_empty());
}
