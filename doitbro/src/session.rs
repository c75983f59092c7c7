//! Session state driven by the identity provider.
//!
//! [`SessionState`] tracks the current session and issues the provider
//! calls for user-initiated sign-in/sign-out. The provider's auth-state
//! notification stream remains the authoritative source of truth:
//! [`apply_notification`](SessionState::apply_notification) can override a
//! locally initiated state (cross-tab sign-out, token expiry).

use std::sync::Arc;

use doitbro_store::client::{AuthError, IdentityProvider};
use doitbro_store::identity::{Identity, OwnerId};

/// The current authentication state of the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// No authenticated identity.
    #[default]
    Anonymous,
    /// Signed in with a stable identity.
    Authenticated(Identity),
}

impl Session {
    /// Owner identity scoping the task subscription, if authenticated.
    #[must_use]
    pub const fn owner(&self) -> Option<&OwnerId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(&identity.id),
        }
    }

    /// Display name of the signed-in user, if authenticated.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(&identity.display_name),
        }
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Tracks the active session and drives the identity provider.
pub struct SessionState<I> {
    provider: Arc<I>,
    current: Session,
}

impl<I: IdentityProvider> SessionState<I> {
    /// Creates an anonymous session bound to the given provider.
    pub fn new(provider: Arc<I>) -> Self {
        Self {
            provider,
            current: Session::Anonymous,
        }
    }

    /// The current session.
    #[must_use]
    pub const fn current(&self) -> &Session {
        &self.current
    }

    /// Run the provider's interactive sign-in.
    ///
    /// On success the session becomes authenticated. On failure or user
    /// cancellation the session stays anonymous and the error is returned
    /// for surfacing; never fatal.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`] when the flow fails.
    pub async fn sign_in(&mut self) -> Result<(), AuthError> {
        match self.provider.sign_in().await {
            Ok(identity) => {
                tracing::info!(owner = %identity.id, "signed in");
                self.current = Session::Authenticated(identity);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign-in failed");
                self.current = Session::Anonymous;
                Err(e)
            }
        }
    }

    /// Sign out of the provider.
    ///
    /// The local session resets to anonymous eagerly, before the remote
    /// call resolves. If the remote sign-out fails, a stale remote session
    /// may persist; the failure is logged and returned but the local state
    /// stays reset.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`] when the remote call fails.
    pub async fn sign_out(&mut self) -> Result<(), AuthError> {
        self.current = Session::Anonymous;
        match self.provider.sign_out().await {
            Ok(()) => {
                tracing::info!("signed out");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "remote sign-out failed; local session reset anyway");
                Err(e)
            }
        }
    }

    /// Apply an external auth-state notification.
    ///
    /// Returns `true` if the session changed (the caller must then re-scope
    /// the task subscription).
    pub fn apply_notification(&mut self, state: Option<Identity>) -> bool {
        let next = state.map_or(Session::Anonymous, Session::Authenticated);
        if next == self.current {
            return false;
        }
        tracing::debug!(
            authenticated = next.is_authenticated(),
            "auth-state notification applied"
        );
        self.current = next;
        true
    }
}
