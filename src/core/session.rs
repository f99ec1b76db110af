//! Credential slot shared by every clone of a client.
//!
//! The bearer token optionally lives in a [`KeyValueStore`] under [`TOKEN_KEY`], the way the
//! browser build keeps it in the `sm_token` cookie. Invalidation is idempotent: only the first
//! call after a login flips the state to [`SessionState::LoggedOut`], so observers redirect to the
//! login surface exactly once.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use crate::core::SmError;
use crate::core::client::constants::TOKEN_KEY;
use crate::core::storage::KeyValueStore;

/// Authentication state as seen by views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No credential has been provided yet.
    Anonymous,
    /// A bearer token is held.
    Active,
    /// The credential was rejected or cleared; the view should show the login surface.
    LoggedOut,
}

#[derive(Debug)]
struct Inner {
    token: RwLock<Option<String>>,
    state: watch::Sender<SessionState>,
    store: Option<Arc<dyn KeyValueStore>>,
}

/// Cheaply cloneable handle to the current credential.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Default for Session {
    fn default() -> Self {
        Self::from_parts(None, None)
    }
}

impl Session {
    /// An anonymous, memory-only session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A memory-only session that starts with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::from_parts(Some(token.into()), None)
    }

    /// A session backed by `store`; a previously saved token is picked up immediately.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn persistent(store: Arc<dyn KeyValueStore>) -> Result<Self, SmError> {
        let token = store.get(TOKEN_KEY)?.filter(|t| !t.trim().is_empty());
        Ok(Self::from_parts(token, Some(store)))
    }

    fn from_parts(token: Option<String>, store: Option<Arc<dyn KeyValueStore>>) -> Self {
        let initial = if token.is_some() {
            SessionState::Active
        } else {
            SessionState::Anonymous
        };
        let (state, _rx) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                token: RwLock::new(token),
                state,
                store,
            }),
        }
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// Observe state transitions (e.g. to navigate to the login view on `LoggedOut`).
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Stores a freshly issued token and marks the session active.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written; the in-memory token is still set.
    pub fn set_token(&self, token: impl Into<String>) -> Result<(), SmError> {
        let token = token.into();
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        self.inner.state.send_replace(SessionState::Active);
        if let Some(store) = &self.inner.store {
            store.set(TOKEN_KEY, &token)?;
        }
        Ok(())
    }

    /// Clears the credential. Returns `true` only for the call that performed the
    /// transition to [`SessionState::LoggedOut`].
    pub fn invalidate(&self) -> bool {
        self.inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let transitioned = self.inner.state.send_if_modified(|s| {
            if *s == SessionState::LoggedOut {
                false
            } else {
                *s = SessionState::LoggedOut;
                true
            }
        });

        if transitioned && let Some(store) = &self.inner.store {
            // Logout proceeds even if the stored copy cannot be removed.
            if let Err(_e) = store.remove(TOKEN_KEY) {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_e, "failed to clear stored token");
            }
        }
        transitioned
    }
}
