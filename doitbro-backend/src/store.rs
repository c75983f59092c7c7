//! In-memory document store with live owner-scoped queries.
//!
//! [`MemoryStore`] holds the `tasks` collection in a map and pushes a full
//! snapshot to every matching subscriber on each change (insert, update,
//! delete, and the initial load). Snapshots are ordered by `created_at`
//! descending, the same ordering the hosted query would apply.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use doitbro_store::client::{DocumentStore, StoreError, TaskSnapshots};
use doitbro_store::identity::OwnerId;
use doitbro_store::task::{NewTask, Task, TaskChange, TaskId};

/// A live query registration: owner filter plus the snapshot channel.
struct Watcher {
    owner: OwnerId,
    tx: mpsc::UnboundedSender<Vec<Task>>,
}

/// Mutable store state behind one lock.
struct Inner {
    docs: HashMap<TaskId, Task>,
    watchers: Vec<Watcher>,
    /// Last timestamp handed out, so assignment stays monotonic even when
    /// the wall clock does not advance between inserts.
    last_assigned_ms: u64,
    /// When set, every write fails with `PermissionDenied` (fault injection
    /// for tests of the error-surfacing path).
    deny_writes: bool,
}

/// In-memory implementation of [`DocumentStore`].
///
/// Thread-safe via a single [`Mutex`]; all operations are short and never
/// block on the channel side (snapshot channels are unbounded, and a closed
/// channel just prunes the watcher).
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                docs: HashMap::new(),
                watchers: Vec::new(),
                last_assigned_ms: 0,
                deny_writes: false,
            }),
        }
    }

    /// Toggle write rejection. While enabled, `insert`/`update`/`delete`
    /// fail with [`StoreError::PermissionDenied`] and no state changes.
    pub fn deny_writes(&self, deny: bool) {
        self.inner.lock().deny_writes = deny;
    }

    /// Number of documents currently stored (all owners).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().docs.len()
    }

    /// Whether the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().docs.is_empty()
    }

    /// Number of live queries currently registered.
    ///
    /// Prunes queries whose handle has been dropped before counting, so the
    /// result reflects subscriptions that can still receive a snapshot.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.watchers.retain(|w| !w.tx.is_closed());
        inner.watchers.len()
    }

    /// Current wall-clock time in milliseconds since epoch.
    fn now_ms() -> u64 {
        u64::try_from(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
        )
        .unwrap_or(u64::MAX)
    }
}

impl Inner {
    /// Assign a server timestamp, strictly greater than the previous one.
    fn assign_timestamp(&mut self) -> u64 {
        let ts = MemoryStore::now_ms().max(self.last_assigned_ms + 1);
        self.last_assigned_ms = ts;
        ts
    }

    /// Build the full current result set for one owner, newest first.
    fn snapshot(&self, owner: &OwnerId) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .docs
            .values()
            .filter(|t| t.owner_id == *owner)
            .cloned()
            .collect();
        // created_at is strictly monotonic per store instance; the id
        // tie-break keeps ordering deterministic across restores.
        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        tasks
    }

    /// Push a fresh snapshot to every watcher scoped to `owner`.
    ///
    /// Watchers whose receiving handle has been dropped are pruned here.
    fn notify(&mut self, owner: &OwnerId) {
        let snapshot = self.snapshot(owner);
        self.watchers
            .retain(|w| w.owner != *owner || w.tx.send(snapshot.clone()).is_ok());
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.deny_writes {
            return Err(StoreError::PermissionDenied);
        }
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    async fn insert(&self, new: NewTask) -> Result<TaskId, StoreError> {
        let mut inner = self.inner.lock();
        inner.check_writable()?;

        let task = Task {
            id: TaskId::new(),
            text: new.text,
            done: false,
            pinned: false,
            created_at: inner.assign_timestamp(),
            owner_id: new.owner_id,
        };
        let id = task.id.clone();
        let owner = task.owner_id.clone();
        inner.docs.insert(id.clone(), task);
        inner.notify(&owner);
        tracing::debug!(task = %id, owner = %owner, "document inserted");
        Ok(id)
    }

    async fn update(&self, id: &TaskId, change: TaskChange) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.check_writable()?;

        let Some(task) = inner.docs.get_mut(id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        match change {
            TaskChange::Done(done) => task.done = done,
            TaskChange::Pinned(pinned) => task.pinned = pinned,
        }
        let owner = task.owner_id.clone();
        inner.notify(&owner);
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.check_writable()?;

        // Idempotent: deleting an unknown id is a no-op success.
        if let Some(task) = inner.docs.remove(id) {
            inner.notify(&task.owner_id);
            tracing::debug!(task = %id, "document deleted");
        }
        Ok(())
    }

    fn subscribe(&self, owner: &OwnerId) -> TaskSnapshots {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        // Initial load: the first snapshot fires immediately.
        let _ = tx.send(inner.snapshot(owner));
        inner.watchers.push(Watcher {
            owner: owner.clone(),
            tx,
        });
        TaskSnapshots::new(rx)
    }
}
