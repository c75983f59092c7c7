//! Write-side command dispatch against the document store.

use std::sync::Arc;

use doitbro_store::client::DocumentStore;
use doitbro_store::task::{MAX_TASK_TEXT_LENGTH, NewTask, Task, TaskChange, TaskId};

use super::CommandError;
use crate::session::Session;

/// Translates user intents into idempotent store writes.
///
/// Never mutates local state: accepted writes surface through the live
/// subscription on the next snapshot. No write is retried; a remote
/// failure is returned for the caller to surface as a transient error.
pub struct CommandDispatcher<S> {
    store: Arc<S>,
    max_text_len: usize,
}

impl<S: DocumentStore> CommandDispatcher<S> {
    /// Creates a dispatcher with the default text length limit.
    pub const fn new(store: Arc<S>) -> Self {
        Self {
            store,
            max_text_len: MAX_TASK_TEXT_LENGTH,
        }
    }

    /// Override the maximum task text length (characters).
    #[must_use]
    pub const fn with_max_text_len(mut self, max_text_len: usize) -> Self {
        self.max_text_len = max_text_len;
        self
    }

    /// Create a new task for the current session.
    ///
    /// Validation happens before any write is issued: an anonymous session
    /// or empty/overlong text rejects the command with no store call.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NotSignedIn`], [`CommandError::TextEmpty`],
    /// [`CommandError::TextTooLong`], or the store's failure.
    pub async fn create(&self, session: &Session, text: &str) -> Result<TaskId, CommandError> {
        let Some(owner) = session.owner() else {
            return Err(CommandError::NotSignedIn);
        };
        if text.is_empty() {
            return Err(CommandError::TextEmpty);
        }
        if text.chars().count() > self.max_text_len {
            return Err(CommandError::TextTooLong {
                max: self.max_text_len,
            });
        }

        let id = self
            .store
            .insert(NewTask {
                text: text.to_string(),
                owner_id: owner.clone(),
            })
            .await?;
        tracing::debug!(task = %id, "create dispatched");
        Ok(id)
    }

    /// Flip the completion flag of a mirrored task.
    ///
    /// # Errors
    ///
    /// Returns the store's failure; the UI reflects the change only once
    /// the subscription re-emits.
    pub async fn toggle_done(&self, task: &Task) -> Result<(), CommandError> {
        self.store
            .update(&task.id, TaskChange::Done(!task.done))
            .await?;
        Ok(())
    }

    /// Flip the pinned flag of a mirrored task.
    ///
    /// # Errors
    ///
    /// Returns the store's failure.
    pub async fn toggle_pin(&self, task: &Task) -> Result<(), CommandError> {
        self.store
            .update(&task.id, TaskChange::Pinned(!task.pinned))
            .await?;
        Ok(())
    }

    /// Delete a task by identifier.
    ///
    /// Idempotent per the store contract: deleting an already-deleted id
    /// is a no-op success.
    ///
    /// # Errors
    ///
    /// Returns the store's failure.
    pub async fn delete(&self, id: &TaskId) -> Result<(), CommandError> {
        self.store.delete(id).await?;
        Ok(())
    }
}
