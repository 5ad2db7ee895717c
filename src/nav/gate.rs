use std::sync::Arc;

use tracing::debug;

use crate::auth::AuthSnapshot;

use super::router::{Location, Route, Router, ScreenArea};

/// Authentication status as the gate sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// Session state has not resolved yet.
    Loading,
    SignedIn,
    SignedOut,
}

impl AuthStatus {
    pub fn of(snapshot: &AuthSnapshot) -> Self {
        if !snapshot.is_loaded {
            AuthStatus::Loading
        } else if snapshot.is_signed_in {
            AuthStatus::SignedIn
        } else {
            AuthStatus::SignedOut
        }
    }
}

/// A navigation the gate wants performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationCommand {
    Replace(Route),
}

/// Decide whether the auth status and current location call for a redirect.
///
/// Pure and level-triggered: the decision depends only on the inputs, and
/// once the commanded navigation lands, re-evaluating yields `None`. While
/// the session is still loading no decision is made, so the current screen
/// stays put until the status resolves.
pub fn decide_navigation(status: AuthStatus, location: &Location) -> Option<NavigationCommand> {
    match (status, location.area()) {
        (AuthStatus::Loading, _) => None,
        (AuthStatus::SignedIn, ScreenArea::Auth) => Some(NavigationCommand::Replace(Route::Home)),
        (AuthStatus::SignedOut, ScreenArea::Main) => {
            Some(NavigationCommand::Replace(Route::SignIn))
        }
        _ => None,
    }
}

/// Applies `decide_navigation` to a live router.
pub struct SessionGate {
    router: Arc<dyn Router>,
}

impl SessionGate {
    pub fn new(router: Arc<dyn Router>) -> Self {
        Self { router }
    }

    /// Evaluate the gate against a session snapshot, performing the redirect
    /// when one is due. Safe to call on every state or location change.
    pub fn evaluate(&self, snapshot: &AuthSnapshot) -> Option<NavigationCommand> {
        let status = AuthStatus::of(snapshot);
        let location = self.router.current();
        let command = decide_navigation(status, &location);

        if let Some(NavigationCommand::Replace(route)) = command {
            debug!(from = %location, to = route.path(), "session gate redirect");
            self.router.replace(route);
        }

        command
    }
}
