//! Client traits for the hosted backend.
//!
//! The client never talks to a concrete backend type: it is generic over
//! [`IdentityProvider`] and [`DocumentStore`], and a backend handle is
//! passed in explicitly (dependency injection). `doitbro-backend` ships
//! the in-process reference implementation used for local mode and tests.

use tokio::sync::mpsc;

use crate::identity::{Identity, OwnerId};
use crate::task::{NewTask, Task, TaskChange, TaskId};

/// Errors that can occur during identity provider operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The user dismissed the interactive sign-in.
    #[error("sign-in cancelled")]
    Cancelled,
    /// The provider rejected or failed the operation.
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Errors that can occur during document store operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The referenced document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),
    /// The caller is not allowed to perform this write.
    #[error("permission denied")]
    PermissionDenied,
    /// The backend could not be reached or failed internally.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Live stream of auth-state notifications.
///
/// The first emission reflects the current state (fires on subscription,
/// equivalent to a page-load notification); later emissions fire on
/// sign-in, sign-out, token refresh, or external session expiry. Dropping
/// the handle unsubscribes.
#[derive(Debug)]
pub struct AuthStates {
    rx: mpsc::UnboundedReceiver<Option<Identity>>,
}

impl AuthStates {
    /// Wrap a receiver fed by the provider.
    #[must_use]
    pub const fn new(rx: mpsc::UnboundedReceiver<Option<Identity>>) -> Self {
        Self { rx }
    }

    /// Wait for the next auth-state notification.
    ///
    /// Returns `None` once the provider has gone away.
    pub async fn recv(&mut self) -> Option<Option<Identity>> {
        self.rx.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<Option<Identity>> {
        self.rx.try_recv().ok()
    }
}

/// Live query handle delivering full task snapshots.
///
/// Every emission carries the complete current matching set, ordered by
/// `created_at` descending, and supersedes any prior delivery (replace, not
/// patch). Dropping the handle unsubscribes the query.
#[derive(Debug)]
pub struct TaskSnapshots {
    rx: mpsc::UnboundedReceiver<Vec<Task>>,
}

impl TaskSnapshots {
    /// Wrap a receiver fed by the store.
    #[must_use]
    pub const fn new(rx: mpsc::UnboundedReceiver<Vec<Task>>) -> Self {
        Self { rx }
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the store has closed the query.
    pub async fn recv(&mut self) -> Option<Vec<Task>> {
        self.rx.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<Vec<Task>> {
        self.rx.try_recv().ok()
    }
}

/// Async identity provider trait.
///
/// Implementations own authentication entirely; the client only tracks the
/// resulting session. The notification stream is the authoritative source
/// of truth and may override locally initiated state (cross-tab sign-out,
/// token expiry).
pub trait IdentityProvider: Send + Sync {
    /// Run the provider's interactive sign-in flow.
    fn sign_in(&self) -> impl std::future::Future<Output = Result<Identity, AuthError>> + Send;

    /// Sign out of the provider.
    fn sign_out(&self) -> impl std::future::Future<Output = Result<(), AuthError>> + Send;

    /// Subscribe to auth-state notifications.
    fn subscribe_auth(&self) -> AuthStates;
}

/// Async document store trait for the `tasks` collection.
///
/// Writes are single independent operations with no transaction or version
/// check; concurrent edits resolve last-write-wins inside the store.
pub trait DocumentStore: Send + Sync {
    /// Insert a new task, returning its store-assigned identifier.
    ///
    /// The store assigns `id` and a server timestamp and defaults
    /// `done`/`pinned` to false.
    fn insert(
        &self,
        new: NewTask,
    ) -> impl std::future::Future<Output = Result<TaskId, StoreError>> + Send;

    /// Apply a single-field update to an existing task.
    fn update(
        &self,
        id: &TaskId,
        change: TaskChange,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Delete a task by identifier.
    ///
    /// Idempotent: deleting an already-deleted id is a no-op success.
    fn delete(&self, id: &TaskId)
    -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Open a live query over the owner's tasks.
    ///
    /// The first snapshot (the initial load) is delivered immediately.
    fn subscribe(&self, owner: &OwnerId) -> TaskSnapshots;
}
