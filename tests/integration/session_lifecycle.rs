//! Integration tests for the session lifecycle through the sync layer.
//!
//! These tests validate:
//! - `spawn_sync` reports a restored session without any user action
//! - Sign-in produces a `SessionChanged` event plus the initial snapshot
//! - Failed sign-in surfaces an error and leaves the session anonymous
//! - Sign-out resets locally even when the remote call fails
//! - External auth-state transitions (another tab, token expiry) override
//!   the local session

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use doitbro::session::Session;
use doitbro::sync::{self, SyncCommand, SyncConfig, SyncEvent};
use doitbro_backend::{MemoryAuth, MemoryStore};
use doitbro_store::identity::Identity;

fn backend() -> (Arc<MemoryAuth>, Arc<MemoryStore>) {
    let provider = Arc::new(MemoryAuth::new(Identity::new("alice", "Alice")));
    let store = Arc::new(MemoryStore::new());
    (provider, store)
}

/// Wait for the next `SessionChanged` event, skipping other events.
async fn next_session(rx: &mut mpsc::Receiver<SyncEvent>) -> Session {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        match tokio::time::timeout(Duration::from_secs(2), rx.recv()).await {
            Ok(Some(SyncEvent::SessionChanged { session })) => return session,
            Ok(Some(_)) => continue,
            Ok(None) => panic!("channel closed while waiting for SessionChanged"),
            Err(_) => break,
        }
    }
    panic!("timeout waiting for SessionChanged event");
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
async fn sign_in_reports_authenticated_session() {
    let (provider, store) = backend();
    let (cmd_tx, mut evt_rx) = sync::spawn_sync(provider, store, SyncConfig::default());

    cmd_tx.send(SyncCommand::SignIn).await.unwrap();

    let session = next_session(&mut evt_rx).await;
    assert!(session.is_authenticated());
    assert_eq!(session.display_name(), Some("Alice"));
}

#[tokio::test]
async fn restored_session_arrives_without_user_action() {
    let (provider, store) = backend();
    // The provider already holds a session before the client starts.
    provider.set_remote_state(Some(Identity::new("alice", "Alice")));

    let (_cmd_tx, mut evt_rx) = sync::spawn_sync(provider, store, SyncConfig::default());

    let session = next_session(&mut evt_rx).await;
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn failed_sign_in_surfaces_error_and_stays_anonymous() {
    let (provider, store) = backend();
    provider.fail_sign_in(true);

    let (cmd_tx, mut evt_rx) = sync::spawn_sync(Arc::clone(&provider), store, SyncConfig::default());
    cmd_tx.send(SyncCommand::SignIn).await.unwrap();

    let message = next_error(&mut evt_rx).await;
    assert!(message.contains("Sign-in failed"), "got: {message}");
    assert_eq!(provider.current(), None);
}

#[tokio::test]
async fn sign_out_reports_anonymous_session() {
    let (provider, store) = backend();
    let (cmd_tx, mut evt_rx) = sync::spawn_sync(provider, store, SyncConfig::default());

    cmd_tx.send(SyncCommand::SignIn).await.unwrap();
    let _signed_in = next_session(&mut evt_rx).await;

    cmd_tx.send(SyncCommand::SignOut).await.unwrap();
    let session = next_session(&mut evt_rx).await;
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn sign_out_resets_locally_even_when_remote_fails() {
    let (provider, store) = backend();
    let (cmd_tx, mut evt_rx) = sync::spawn_sync(Arc::clone(&provider), store, SyncConfig::default());

    cmd_tx.send(SyncCommand::SignIn).await.unwrap();
    let _signed_in = next_session(&mut evt_rx).await;

    provider.fail_sign_out(true);
    cmd_tx.send(SyncCommand::SignOut).await.unwrap();

    // The remote failure is reported, but the session still resets.
    let message = next_error(&mut evt_rx).await;
    assert!(message.contains("sign-out failed"), "got: {message}");
    let session = next_session(&mut evt_rx).await;
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn external_sign_out_overrides_local_session() {
    let (provider, store) = backend();
    let (cmd_tx, mut evt_rx) = sync::spawn_sync(Arc::clone(&provider), store, SyncConfig::default());

    cmd_tx.send(SyncCommand::SignIn).await.unwrap();
    let _signed_in = next_session(&mut evt_rx).await;

    // Another tab signs out, or the provider expires the session.
    provider.set_remote_state(None);

    let session = next_session(&mut evt_rx).await;
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn shutdown_command_terminates_cleanly() {
    let (provider, store) = backend();
    let (cmd_tx, _evt_rx) = sync::spawn_sync(provider, store, SyncConfig::default());

    cmd_tx.send(SyncCommand::Shutdown).await.unwrap();

    // Brief pause to let the task process shutdown.
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Sending another command should fail (channel closed).
    let result = cmd_tx.send(SyncCommand::SignIn).await;
    assert!(result.is_err(), "channel should be closed after shutdown");
}
