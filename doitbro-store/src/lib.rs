//! Backend SDK surface for `doitbro`.
//!
//! Defines the shared task and identity data model plus the client traits
//! ([`DocumentStore`](client::DocumentStore), [`IdentityProvider`](client::IdentityProvider))
//! that any hosted backend must satisfy. The client crate consumes these
//! traits via dependency injection, so tests can substitute an in-memory
//! backend for the real service.

pub mod client;
pub mod identity;
pub mod task;
