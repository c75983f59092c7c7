//! Sync coordinator wiring the TUI to the backend SDK.
//!
//! Bridges the synchronous TUI event loop (crossterm poll-based) with the
//! async identity-provider / document-store SDK. It spawns one background
//! tokio task and communicates with the main thread via [`SyncCommand`] /
//! [`SyncEvent`] channels.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── SyncEvent ───  tokio background task
//!                     ─── SyncCommand →
//! ```
//!
//! The main thread sends [`SyncCommand`]s (sign in, create a task, ...) and
//! drains [`SyncEvent`]s (session changed, snapshot arrived) on each tick
//! of the poll-based event loop. The background task owns the session
//! state, the live task subscription, and the command dispatcher; its
//! single `select!` loop guarantees that the previous subscription is torn
//! down before a new one opens and that a late snapshot from a torn-down
//! query is never delivered.

use std::sync::Arc;

use tokio::sync::mpsc;

use doitbro_store::client::{DocumentStore, IdentityProvider};
use doitbro_store::task::{Task, TaskId};

use crate::session::{Session, SessionState};
use crate::tasks::{CommandDispatcher, TaskSubscription};

/// Commands sent from the TUI main loop to the sync background task.
#[derive(Debug)]
pub enum SyncCommand {
    /// Run the provider's interactive sign-in.
    SignIn,
    /// Sign out and clear the local mirror.
    SignOut,
    /// Create a new task with the given text.
    Create {
        /// The task text to insert.
        text: String,
    },
    /// Flip the completion flag of a mirrored task.
    ToggleDone {
        /// The mirrored task to update.
        task: Task,
    },
    /// Flip the pinned flag of a mirrored task.
    TogglePin {
        /// The mirrored task to update.
        task: Task,
    },
    /// Delete a task by identifier.
    Delete {
        /// Identifier of the task to delete.
        id: TaskId,
    },
    /// Gracefully shut down the sync task.
    Shutdown,
}

/// Events sent from the sync background task to the TUI main loop.
#[derive(Debug)]
pub enum SyncEvent {
    /// The session changed (sign-in, sign-out, or an external auth-state
    /// notification).
    SessionChanged {
        /// The new session.
        session: Session,
    },
    /// A full snapshot of the active owner's tasks, newest first,
    /// superseding any prior delivery.
    TasksSnapshot {
        /// The complete current task set.
        tasks: Vec<Task>,
    },
    /// A transient, dismissible error for the status bar.
    Error(String),
}

/// Configuration for the sync layer.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Channel capacity for command/event mpsc channels.
    pub channel_capacity: usize,
    /// Maximum task text length enforced before a create is issued.
    pub max_text_len: usize,
}

/// Default channel capacity for commands and events.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_text_len: doitbro_store::task::MAX_TASK_TEXT_LENGTH,
        }
    }
}

/// Spawn the sync background task and return channel handles.
///
/// The task subscribes to auth-state notifications immediately, so the
/// provider's current state (e.g. a restored session) reaches the TUI as
/// the first [`SyncEvent::SessionChanged`] without any user action.
pub fn spawn_sync<I, S>(
    provider: Arc<I>,
    store: Arc<S>,
    config: SyncConfig,
) -> (mpsc::Sender<SyncCommand>, mpsc::Receiver<SyncEvent>)
where
    I: IdentityProvider + 'static,
    S: DocumentStore + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<SyncCommand>(config.channel_capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<SyncEvent>(config.channel_capacity);

    tokio::spawn(async move {
        run(provider, store, config, cmd_rx, evt_tx).await;
    });

    (cmd_tx, evt_rx)
}

/// The coordinator loop.
///
/// Three event sources feed it: commands from the TUI, auth-state
/// notifications from the provider, and snapshots from the live query.
/// Exactly one subscription is ever open; `rescope` tears it down before
/// opening the next.
async fn run<I, S>(
    provider: Arc<I>,
    store: Arc<S>,
    config: SyncConfig,
    mut cmd_rx: mpsc::Receiver<SyncCommand>,
    evt_tx: mpsc::Sender<SyncEvent>,
) where
    I: IdentityProvider,
    S: DocumentStore,
{
    let mut session = SessionState::new(Arc::clone(&provider));
    let mut subscription = TaskSubscription::new(Arc::clone(&store));
    let dispatcher = CommandDispatcher::new(store).with_max_text_len(config.max_text_len);
    let mut auth_rx = provider.subscribe_auth();
    let mut auth_open = true;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    None | Some(SyncCommand::Shutdown) => {
                        subscription.stop();
                        tracing::info!("sync task shutting down");
                        break;
                    }
                    Some(SyncCommand::SignIn) => match session.sign_in().await {
                        Ok(()) => rescope(&mut subscription, session.current(), &evt_tx).await,
                        Err(e) => {
                            let _ = evt_tx
                                .send(SyncEvent::Error(format!("Sign-in failed: {e}")))
                                .await;
                        }
                    },
                    Some(SyncCommand::SignOut) => {
                        // Eager local teardown: the subscription closes and
                        // the mirror clears regardless of the remote outcome.
                        subscription.stop();
                        if let Err(e) = session.sign_out().await {
                            let _ = evt_tx
                                .send(SyncEvent::Error(format!("Remote sign-out failed: {e}")))
                                .await;
                        }
                        rescope(&mut subscription, session.current(), &evt_tx).await;
                    }
                    Some(SyncCommand::Create { text }) => {
                        if let Err(e) = dispatcher.create(session.current(), &text).await {
                            let _ = evt_tx.send(SyncEvent::Error(e.to_string())).await;
                        }
                    }
                    Some(SyncCommand::ToggleDone { task }) => {
                        if let Err(e) = dispatcher.toggle_done(&task).await {
                            let _ = evt_tx
                                .send(SyncEvent::Error(format!("Update failed: {e}")))
                                .await;
                        }
                    }
                    Some(SyncCommand::TogglePin { task }) => {
                        if let Err(e) = dispatcher.toggle_pin(&task).await {
                            let _ = evt_tx
                                .send(SyncEvent::Error(format!("Update failed: {e}")))
                                .await;
                        }
                    }
                    Some(SyncCommand::Delete { id }) => {
                        if let Err(e) = dispatcher.delete(&id).await {
                            let _ = evt_tx
                                .send(SyncEvent::Error(format!("Delete failed: {e}")))
                                .await;
                        }
                    }
                }
            }
            state = auth_rx.recv(), if auth_open => {
                match state {
                    Some(state) => {
                        if session.apply_notification(state) {
                            rescope(&mut subscription, session.current(), &evt_tx).await;
                        }
                    }
                    None => {
                        tracing::debug!("auth-state stream closed");
                        auth_open = false;
                    }
                }
            }
            tasks = subscription.next_snapshot() => {
                let _ = evt_tx.send(SyncEvent::TasksSnapshot { tasks }).await;
            }
        }
    }
}

/// Re-point the subscription at the current session's owner and report the
/// change to the TUI.
///
/// While anonymous, an empty snapshot is emitted immediately so the mirror
/// clears without waiting for a store that will never answer.
async fn rescope<S: DocumentStore>(
    subscription: &mut TaskSubscription<S>,
    session: &Session,
    evt_tx: &mpsc::Sender<SyncEvent>,
) {
    subscription.follow(session.owner());
    let _ = evt_tx
        .send(SyncEvent::SessionChanged {
            session: session.clone(),
        })
        .await;
    if !session.is_authenticated() {
        let _ = evt_tx
            .send(SyncEvent::TasksSnapshot { tasks: Vec::new() })
            .await;
    }
}
