//! Task mirroring, projection, and write dispatch.
//!
//! Three pieces: [`TaskSubscription`] keeps a live read-only mirror of the
//! active owner's tasks, [`view::project`] derives the render order from
//! the mirror and the selected [`ViewMode`], and [`CommandDispatcher`]
//! translates user intents into store writes. Local state is never mutated
//! directly by a write; the subscription reflects accepted writes on the
//! next snapshot.

pub mod dispatch;
pub mod subscription;
pub mod view;

pub use dispatch::CommandDispatcher;
pub use subscription::TaskSubscription;
pub use view::{ViewMode, project};

use thiserror::Error;

use doitbro_store::client::StoreError;

/// Errors surfaced when dispatching a task command.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Task text cannot be empty.
    #[error("task text cannot be empty")]
    TextEmpty,
    /// Task text exceeds the configured maximum length.
    #[error("task text too long (max {max} characters)")]
    TextTooLong {
        /// The configured maximum.
        max: usize,
    },
    /// Creating a task requires an authenticated session.
    #[error("sign in to add a task")]
    NotSignedIn,
    /// The store rejected or failed the write.
    #[error(transparent)]
    Store(#[from] StoreError),
}
