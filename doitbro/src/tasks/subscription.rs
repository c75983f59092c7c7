//! Live task-query lifecycle management.
//!
//! [`TaskSubscription`] owns at most one live query against the document
//! store at any time. Re-pointing it at a new owner tears down the previous
//! query before the next one opens, so two owners' snapshot streams can
//! never race; while anonymous, zero queries are active.

use std::sync::Arc;

use doitbro_store::client::{DocumentStore, TaskSnapshots};
use doitbro_store::identity::OwnerId;
use doitbro_store::task::Task;

/// One open live query.
struct ActiveQuery {
    owner: OwnerId,
    snapshots: TaskSnapshots,
}

/// Cancellable handle over the store's live task query.
pub struct TaskSubscription<S> {
    store: Arc<S>,
    active: Option<ActiveQuery>,
}

impl<S: DocumentStore> TaskSubscription<S> {
    /// Creates an inactive subscription bound to the given store.
    pub const fn new(store: Arc<S>) -> Self {
        Self {
            store,
            active: None,
        }
    }

    /// Point the subscription at `owner`.
    ///
    /// Any previous query is torn down first (dropping its handle
    /// unsubscribes it at the store). `None` leaves no active query.
    pub fn follow(&mut self, owner: Option<&OwnerId>) {
        // Teardown strictly precedes the new subscribe.
        self.active = None;
        if let Some(owner) = owner {
            tracing::debug!(owner = %owner, "opening task subscription");
            self.active = Some(ActiveQuery {
                owner: owner.clone(),
                snapshots: self.store.subscribe(owner),
            });
        }
    }

    /// Tear down the active query, if any.
    pub fn stop(&mut self) {
        if self.active.is_some() {
            tracing::debug!("task subscription stopped");
        }
        self.active = None;
    }

    /// Owner the active query is scoped to, if any.
    #[must_use]
    pub fn owner(&self) -> Option<&OwnerId> {
        self.active.as_ref().map(|q| &q.owner)
    }

    /// Whether a live query is currently open.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Wait for the next full snapshot.
    ///
    /// Pends forever while no query is active (or after the store closes
    /// the stream), so it can be parked in a `select!` loop. Cancel-safe.
    pub async fn next_snapshot(&mut self) -> Vec<Task> {
        loop {
            match &mut self.active {
                Some(query) => match query.snapshots.recv().await {
                    Some(tasks) => return tasks,
                    None => {
                        tracing::debug!("task stream closed by the store");
                        self.active = None;
                    }
                },
                None => std::future::pending::<()>().await,
            }
        }
    }
}
