//! Task document model shared between the client and backends.
//!
//! A [`Task`] is owned by the document store and mirrored read-only in the
//! client; the only client-supplied fields are gathered in [`NewTask`], and
//! mutations travel as single-field [`TaskChange`] patches.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::OwnerId;

/// Default maximum allowed task text length in characters.
pub const MAX_TASK_TEXT_LENGTH: usize = 256;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
///
/// Assigned by the store at insert; opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A to-do task document.
///
/// The store is the single source of truth; the client never mutates a
/// mirrored `Task` directly, it issues writes and waits for the next
/// snapshot to reflect them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned unique identifier.
    pub id: TaskId,
    /// User-entered task text. Non-empty by construction (validated before
    /// the insert is issued).
    pub text: String,
    /// Whether the task has been completed.
    pub done: bool,
    /// Pinned tasks always sort ahead of unpinned ones.
    pub pinned: bool,
    /// Server-assigned creation time in milliseconds since epoch,
    /// monotonically non-decreasing per owner at assignment time.
    pub created_at: u64,
    /// Identity of the creating user; immutable after creation.
    pub owner_id: OwnerId,
}

/// Client-supplied fields for a task insert.
///
/// The store fills in `id`, `created_at`, and the `done`/`pinned` defaults
/// (both false).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Task text.
    pub text: String,
    /// Owner the task is created for.
    pub owner_id: OwnerId,
}

/// A partial update to a single mutable task field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskChange {
    /// Set the completion flag.
    Done(bool),
    /// Set the pinned flag.
    Pinned(bool),
}
