//! Screen controllers for the auth flow and the landing screen.
//!
//! Controllers hold nothing but form state and drive the services: they do
//! not render. A shell (terminal today) reads their fields and forwards
//! input. Navigation on success is replace-only, matching what the session
//! gate would decide, so the gate finds nothing left to do afterwards.

use std::sync::Arc;

use tracing::debug;

use crate::auth::{
    resolve_completion, AuthError, IdentityProvider, OAuthCompletion, OAuthOutcome, SessionManager,
};
use crate::nav::{Route, Router};
use crate::profile::{save_user_profile, ProfileStore, UserProfile};

pub mod home;
pub mod sign_in;
pub mod sign_up;

pub use home::HomeScreen;
pub use sign_in::SignInScreen;
pub use sign_up::SignUpScreen;

/// Services shared by the screen controllers.
pub struct ScreenContext {
    pub provider: Arc<dyn IdentityProvider>,
    pub sessions: Arc<SessionManager>,
    pub profiles: Arc<dyn ProfileStore>,
    pub router: Arc<dyn Router>,
}

/// Shared tail of an OAuth handoff: activate the created session, sync the
/// profile when the completion identifies a user, and land on home.
///
/// A completion without a session is not an error; the user walked away
/// from the browser and stays where they are.
pub(crate) async fn complete_oauth(
    ctx: &ScreenContext,
    completion: &OAuthCompletion,
) -> Result<(), AuthError> {
    let Some(resolved) = resolve_completion(completion) else {
        debug!("OAuth handoff produced no session");
        return Ok(());
    };

    ctx.sessions.activate(&resolved.session_id).await?;

    match resolved.outcome {
        Some(OAuthOutcome::NewUser {
            id,
            email,
            first_name,
            last_name,
        }) => {
            let profile = UserProfile {
                id,
                email,
                first_name,
                last_name,
            };
            save_user_profile(ctx.profiles.as_ref(), &profile).await;
        }
        Some(OAuthOutcome::ExistingUser { id }) => {
            save_user_profile(ctx.profiles.as_ref(), &UserProfile::id_only(id)).await;
        }
        None => debug!("OAuth completion carried no user identity, skipping profile sync"),
    }

    ctx.router.replace(Route::Home);
    Ok(())
}
