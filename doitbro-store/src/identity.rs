//! Identity types shared between the client and backends.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of the user who owns a task.
///
/// Assigned by the identity provider and immutable for the lifetime of the
/// account. Used to scope task subscriptions: a user only ever observes
/// their own tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create a new owner identifier from a string representation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the string representation of this owner ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An authenticated identity as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable unique identifier.
    pub id: OwnerId,
    /// Human-readable display name.
    pub display_name: String,
}

impl Identity {
    /// Create an identity from an owner ID and display name.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: OwnerId::new(id),
            display_name: display_name.into(),
        }
    }
}
