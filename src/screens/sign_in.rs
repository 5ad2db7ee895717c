use tracing::{error, info};

use crate::auth::OAuthProvider;
use crate::nav::Route;

use super::{complete_oauth, ScreenContext};

/// Message shown when the provider gives no structured sign-in error
const SIGN_IN_FALLBACK: &str = "Failed to sign in. Please check your credentials.";

/// Sign-in screen controller.
#[derive(Default)]
pub struct SignInScreen {
    pub email: String,
    pub password: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl SignInScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen with the email field prefilled.
    pub fn with_email(email: String) -> Self {
        Self {
            email,
            ..Self::default()
        }
    }

    /// Submit the password form.
    ///
    /// On a `Complete` attempt the session is activated and navigation is
    /// replaced to home. Provider rejections surface their first message on
    /// `error`; an incomplete attempt is logged and leaves the screen alone.
    pub async fn submit(&mut self, ctx: &ScreenContext) {
        if self.email.is_empty() || self.password.is_empty() {
            self.error = Some("Email and password required".to_string());
            return;
        }

        self.loading = true;
        self.error = None;

        match ctx.provider.sign_in_create(&self.email, &self.password).await {
            Ok(attempt) if attempt.status.is_complete() => {
                match attempt.created_session_id.as_deref() {
                    Some(session_id) => match ctx.sessions.activate(session_id).await {
                        Ok(_) => {
                            info!("sign-in complete");
                            self.password.clear();
                            ctx.router.replace(Route::Home);
                        }
                        Err(e) => {
                            error!(error = %e, "Session activation failed");
                            self.error = Some(e.user_message(SIGN_IN_FALLBACK));
                        }
                    },
                    None => {
                        error!("complete sign-in attempt carried no session id");
                        self.error = Some(SIGN_IN_FALLBACK.to_string());
                    }
                }
            }
            Ok(attempt) => {
                // Further factors (MFA and friends) are not handled here.
                error!(status = ?attempt.status, "sign-in did not complete");
            }
            Err(e) => {
                error!(error = %e, "Sign-in failed");
                self.error = Some(e.user_message(SIGN_IN_FALLBACK));
            }
        }

        self.loading = false;
    }

    /// Run the Google OAuth handoff. Failures are logged, never shown; the
    /// browser already told the user what went wrong.
    pub async fn continue_with_google(&mut self, ctx: &ScreenContext) {
        self.loading = true;

        match ctx.provider.start_oauth(OAuthProvider::Google).await {
            Ok(completion) => {
                if let Err(e) = complete_oauth(ctx, &completion).await {
                    error!(error = %e, "OAuth error");
                }
            }
            Err(e) => error!(error = %e, "OAuth error"),
        }

        self.loading = false;
    }
}
