//! Process-wide session state.
//!
//! `SessionManager` owns the session lifecycle: restoring a cached token at
//! startup, activating the session a completed flow produced, and signing
//! out. The rest of the app observes it through `AuthSnapshot` values on a
//! watch channel and never touches the provider's session machinery.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cache::TokenCache;

use super::client::IdentityProvider;
use super::error::AuthError;
use super::types::AuthUser;

/// Cache key for the session client token
pub const SESSION_TOKEN_KEY: &str = "session-token";

/// Point-in-time view of the auth session.
///
/// `is_loaded` is false only before startup restoration has resolved; until
/// then `is_signed_in` says nothing and consumers should hold their fire.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSnapshot {
    pub is_loaded: bool,
    pub is_signed_in: bool,
    pub user: Option<AuthUser>,
}

impl AuthSnapshot {
    pub fn loading() -> Self {
        Self {
            is_loaded: false,
            is_signed_in: false,
            user: None,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            is_loaded: true,
            is_signed_in: false,
            user: None,
        }
    }

    pub fn signed_in(user: AuthUser) -> Self {
        Self {
            is_loaded: true,
            is_signed_in: true,
            user: Some(user),
        }
    }
}

pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    cache: Option<TokenCache>,
    token: Mutex<Option<String>>,
    tx: watch::Sender<AuthSnapshot>,
}

impl SessionManager {
    /// A manager starts in the loading state until `initialize` runs.
    /// `cache` is `None` on platforms without token persistence.
    pub fn new(provider: Arc<dyn IdentityProvider>, cache: Option<TokenCache>) -> Self {
        let (tx, _) = watch::channel(AuthSnapshot::loading());
        Self {
            provider,
            cache,
            token: Mutex::new(None),
            tx,
        }
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.tx.subscribe()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.tx.borrow().clone()
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock().expect("session token lock") = token;
    }

    fn current_token(&self) -> Option<String> {
        self.token.lock().expect("session token lock").clone()
    }

    /// Resolve the startup session state from the cached token, if any.
    ///
    /// Always leaves the state loaded. A token that no longer maps to a live
    /// session is cleared from the cache; a provider failure downgrades to
    /// signed-out without clearing, so the next start can try again.
    pub async fn initialize(&self) {
        let cached = match &self.cache {
            Some(cache) => cache.get(SESSION_TOKEN_KEY).await,
            None => None,
        };

        let snapshot = match cached {
            Some(token) => match self.provider.restore_session(&token).await {
                Ok(Some(session)) => {
                    info!(user = %session.user.id, "session restored from cached token");
                    self.set_token(Some(session.token));
                    AuthSnapshot::signed_in(session.user)
                }
                Ok(None) => {
                    debug!("cached token is stale, clearing it");
                    self.clear_cached_token().await;
                    AuthSnapshot::signed_out()
                }
                Err(e) => {
                    warn!(error = %e, "Failed to restore cached session");
                    AuthSnapshot::signed_out()
                }
            },
            None => AuthSnapshot::signed_out(),
        };

        self.tx.send_replace(snapshot);
    }

    /// Activate the session a completed flow produced, persist its token,
    /// and flip the state to signed-in. Returns the session's user.
    pub async fn activate(&self, session_id: &str) -> Result<AuthUser, AuthError> {
        let session = self.provider.activate_session(session_id).await?;

        if let Some(cache) = &self.cache {
            cache.set(SESSION_TOKEN_KEY, &session.token).await;
        }
        self.set_token(Some(session.token));

        self.tx
            .send_replace(AuthSnapshot::signed_in(session.user.clone()));
        Ok(session.user)
    }

    /// End the current session. Provider-side revocation is best-effort;
    /// local state and the cached token are always cleared.
    pub async fn sign_out(&self) {
        if let Some(token) = self.current_token() {
            if let Err(e) = self.provider.sign_out(&token).await {
                warn!(error = %e, "Provider sign-out failed");
            }
        }

        self.set_token(None);
        self.clear_cached_token().await;
        self.tx.send_replace(AuthSnapshot::signed_out());
    }

    async fn clear_cached_token(&self) {
        if let Some(cache) = &self.cache {
            cache.clear(SESSION_TOKEN_KEY).await;
        }
    }
}
