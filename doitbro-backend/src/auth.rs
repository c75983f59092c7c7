//! In-memory identity provider with an auth-state notification stream.
//!
//! [`MemoryAuth`] is configured with a single local profile; `sign_in`
//! resolves that profile without any interactive flow. Every state change
//! is pushed to all auth-state subscribers, and tests can inject external
//! transitions (cross-tab sign-out, token expiry) via
//! [`set_remote_state`](MemoryAuth::set_remote_state).

use parking_lot::Mutex;
use tokio::sync::mpsc;

use doitbro_store::client::{AuthError, AuthStates, IdentityProvider};
use doitbro_store::identity::Identity;

/// Mutable provider state behind one lock.
struct Inner {
    current: Option<Identity>,
    listeners: Vec<mpsc::UnboundedSender<Option<Identity>>>,
    /// When set, `sign_in` fails as if the user dismissed the flow.
    fail_sign_in: bool,
    /// When set, `sign_out` fails remotely (the local session is still
    /// expected to reset eagerly on the client side).
    fail_sign_out: bool,
}

/// In-memory implementation of [`IdentityProvider`].
pub struct MemoryAuth {
    profile: Identity,
    inner: Mutex<Inner>,
}

impl MemoryAuth {
    /// Creates a provider that signs in as `profile`.
    #[must_use]
    pub fn new(profile: Identity) -> Self {
        Self {
            profile,
            inner: Mutex::new(Inner {
                current: None,
                listeners: Vec::new(),
                fail_sign_in: false,
                fail_sign_out: false,
            }),
        }
    }

    /// Make the next `sign_in` calls fail with [`AuthError::Cancelled`].
    pub fn fail_sign_in(&self, fail: bool) {
        self.inner.lock().fail_sign_in = fail;
    }

    /// Make `sign_out` calls fail remotely. The provider keeps its session,
    /// mirroring a stale remote session after a failed remote sign-out.
    pub fn fail_sign_out(&self, fail: bool) {
        self.inner.lock().fail_sign_out = fail;
    }

    /// Currently signed-in identity, if any.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.inner.lock().current.clone()
    }

    /// Inject an external auth-state transition and notify subscribers.
    ///
    /// Models notifications the client did not initiate: another tab
    /// signing out, or the provider expiring the session.
    pub fn set_remote_state(&self, state: Option<Identity>) {
        let mut inner = self.inner.lock();
        inner.current = state.clone();
        inner.broadcast(&state);
    }
}

impl Inner {
    /// Push a state notification to every live subscriber, pruning closed ones.
    fn broadcast(&mut self, state: &Option<Identity>) {
        self.listeners.retain(|tx| tx.send(state.clone()).is_ok());
    }
}

impl IdentityProvider for MemoryAuth {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        let mut inner = self.inner.lock();
        if inner.fail_sign_in {
            return Err(AuthError::Cancelled);
        }
        inner.current = Some(self.profile.clone());
        inner.broadcast(&Some(self.profile.clone()));
        tracing::debug!(owner = %self.profile.id, "signed in");
        Ok(self.profile.clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut inner = self.inner.lock();
        if inner.fail_sign_out {
            return Err(AuthError::Provider("sign-out failed".to_string()));
        }
        inner.current = None;
        inner.broadcast(&None);
        tracing::debug!("signed out");
        Ok(())
    }

    fn subscribe_auth(&self) -> AuthStates {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        // First notification reflects the current state, like the
        // page-load callback of a hosted provider.
        let _ = tx.send(inner.current.clone());
        inner.listeners.push(tx);
        AuthStates::new(rx)
    }
}
