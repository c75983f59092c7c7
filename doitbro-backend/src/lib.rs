//! In-process reference backend for `doitbro`.
//!
//! Implements the `doitbro-store` client traits with in-memory state and
//! tokio channels for live notifications. Used by the client as the default
//! local backend and by tests as an injectable fake — the behavior matches
//! the hosted service contract (server timestamps, full-snapshot live
//! queries, idempotent deletes) without any network I/O.

pub mod auth;
pub mod store;

pub use auth::MemoryAuth;
pub use store::MemoryStore;
