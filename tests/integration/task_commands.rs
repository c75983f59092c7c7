//! Integration tests for task commands dispatched through the sync layer.
//!
//! These tests validate:
//! - Create/toggle/delete round through the store and come back as snapshots
//! - Validation failures surface as `Error` events with no write issued
//! - A denied write is reported and leaves the mirrored state unchanged
//! - Delete is idempotent

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use doitbro::sync::{self, SyncCommand, SyncConfig, SyncEvent};
use doitbro_backend::{MemoryAuth, MemoryStore};
use doitbro_store::identity::Identity;
use doitbro_store::task::{Task, TaskId};

fn backend() -> (Arc<MemoryAuth>, Arc<MemoryStore>) {
    let provider = Arc::new(MemoryAuth::new(Identity::new("alice", "Alice")));
    let store = Arc::new(MemoryStore::new());
    (provider, store)
}

/// Spawn the sync task and sign in, returning the channels after the
/// initial (empty) snapshot has been consumed.
async fn signed_in_sync(
    provider: Arc<MemoryAuth>,
    store: Arc<MemoryStore>,
) -> (mpsc::Sender<SyncCommand>, mpsc::Receiver<SyncEvent>) {
    let (cmd_tx, mut evt_rx) = sync::spawn_sync(provider, store, SyncConfig::default());
    cmd_tx.send(SyncCommand::SignIn).await.unwrap();
    let initial = next_snapshot(&mut evt_rx).await;
    assert!(initial.is_empty());
    (cmd_tx, evt_rx)
}

/// Wait for the next `TasksSnapshot` event, skipping other events.
async fn next_snapshot(rx: &mut mpsc::Receiver<SyncEvent>) -> Vec<Task> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        match tokio::time::timeout(Duration::from_secs(2), rx.recv()).await {
            Ok(Some(SyncEvent::TasksSnapshot { tasks })) => return tasks,
            Ok(Some(_)) => continue,
            Ok(None) => panic!("channel closed while waiting for TasksSnapshot"),
            Err(_) => break,
        }
    }
    panic!("timeout waiting for TasksSnapshot event");
}

/// Wait for the next `Error` event, skipping other events.
async fn next_error(rx: &mut mpsc::Receiver<SyncEvent>) -> String {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        match tokio::time::timeout(Duration::from_secs(2), rx.recv()).await {
            Ok(Some(SyncEvent::Error(message))) => return message,
            Ok(Some(_)) => continue,
            Ok(None) => panic!("channel closed while waiting for Error"),
            Err(_) => break,
        }
    }
    panic!("timeout waiting for Error event");
}

#[tokio::test]
async fn create_round_trips_into_a_snapshot() {
    let (provider, store) = backend();
    let (cmd_tx, mut evt_rx) = signed_in_sync(provider, store).await;

    cmd_tx
        .send(SyncCommand::Create {
            text: "buy milk".to_string(),
        })
        .await
        .unwrap();

    let tasks = next_snapshot(&mut evt_rx).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "buy milk");
    assert!(!tasks[0].done);
    assert!(!tasks[0].pinned);
}

#[tokio::test]
async fn snapshots_arrive_newest_first() {
    let (provider, store) = backend();
    let (cmd_tx, mut evt_rx) = signed_in_sync(provider, store).await;

    for text in ["first", "second", "third"] {
        cmd_tx
            .send(SyncCommand::Create {
                text: text.to_string(),
            })
            .await
            .unwrap();
    }

    // Snapshots supersede each other; wait until all three are in.
    let mut tasks = next_snapshot(&mut evt_rx).await;
    while tasks.len() < 3 {
        tasks = next_snapshot(&mut evt_rx).await;
    }
    let texts: Vec<&str> = tasks.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["third", "second", "first"]);
    // Server timestamps are strictly increasing here, so newest first.
    assert!(tasks[0].created_at > tasks[2].created_at);
}

#[tokio::test]
async fn toggle_done_and_pin_come_back_in_snapshots() {
    let (provider, store) = backend();
    let (cmd_tx, mut evt_rx) = signed_in_sync(provider, store).await;

    cmd_tx
        .send(SyncCommand::Create {
            text: "task".to_string(),
        })
        .await
        .unwrap();
    let task = next_snapshot(&mut evt_rx).await.remove(0);

    cmd_tx
        .send(SyncCommand::ToggleDone { task: task.clone() })
        .await
        .unwrap();
    let task = next_snapshot(&mut evt_rx).await.remove(0);
    assert!(task.done);

    cmd_tx.send(SyncCommand::TogglePin { task }).await.unwrap();
    let task = next_snapshot(&mut evt_rx).await.remove(0);
    assert!(task.done);
    assert!(task.pinned);
}

#[tokio::test]
async fn delete_removes_the_task() {
    let (provider, store) = backend();
    let (cmd_tx, mut evt_rx) = signed_in_sync(provider, store).await;

    cmd_tx
        .send(SyncCommand::Create {
            text: "task".to_string(),
        })
        .await
        .unwrap();
    let task = next_snapshot(&mut evt_rx).await.remove(0);

    cmd_tx
        .send(SyncCommand::Delete {
            id: task.id.clone(),
        })
        .await
        .unwrap();
    let tasks = next_snapshot(&mut evt_rx).await;
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn delete_unknown_id_is_silent() {
    let (provider, store) = backend();
    let (cmd_tx, mut evt_rx) = signed_in_sync(provider, store).await;

    cmd_tx
        .send(SyncCommand::Delete { id: TaskId::new() })
        .await
        .unwrap();

    // No error; a follow-up create still works.
    cmd_tx
        .send(SyncCommand::Create {
            text: "after".to_string(),
        })
        .await
        .unwrap();
    let tasks = next_snapshot(&mut evt_rx).await;
    assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn create_while_anonymous_is_rejected() {
    let (provider, store) = backend();
    let (cmd_tx, mut evt_rx) =
        sync::spawn_sync(provider, Arc::clone(&store), SyncConfig::default());

    cmd_tx
        .send(SyncCommand::Create {
            text: "orphan".to_string(),
        })
        .await
        .unwrap();

    let message = next_error(&mut evt_rx).await;
    assert!(message.contains("sign in"), "got: {message}");
    assert!(store.is_empty());
}

#[tokio::test]
async fn create_with_empty_text_is_rejected() {
    let (provider, store) = backend();
    let (cmd_tx, mut evt_rx) = signed_in_sync(provider, Arc::clone(&store)).await;

    cmd_tx
        .send(SyncCommand::Create {
            text: String::new(),
        })
        .await
        .unwrap();

    let _message = next_error(&mut evt_rx).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn denied_write_surfaces_as_error_and_changes_nothing() {
    let (provider, store) = backend();
    let (cmd_tx, mut evt_rx) = signed_in_sync(provider, Arc::clone(&store)).await;

    cmd_tx
        .send(SyncCommand::Create {
            text: "kept".to_string(),
        })
        .await
        .unwrap();
    let task = next_snapshot(&mut evt_rx).await.remove(0);

    store.deny_writes(true);
    cmd_tx
        .send(SyncCommand::ToggleDone { task: task.clone() })
        .await
        .unwrap();

    let message = next_error(&mut evt_rx).await;
    assert!(message.contains("permission denied"), "got: {message}");

    // The store still holds the unmodified task.
    store.deny_writes(false);
    cmd_tx
        .send(SyncCommand::Delete { id: task.id })
        .await
        .unwrap();
    let tasks = next_snapshot(&mut evt_rx).await;
    assert!(tasks.is_empty());
}
