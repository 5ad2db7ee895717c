use tracing::{debug, error, info};

use crate::auth::{OAuthProvider, SignUpFields};
use crate::nav::Route;
use crate::profile::{save_user_profile, UserProfile};

use super::{complete_oauth, ScreenContext};

/// Message shown when the provider gives no structured sign-up error
const SIGN_UP_FALLBACK: &str = "Failed to sign up.";

/// Message shown when the provider gives no structured verification error
const VERIFY_FALLBACK: &str = "Failed to verify.";

/// Sign-up screen controller.
///
/// The flow has two phases: submitting the form creates the sign-up and
/// sends a verification code to the email; submitting the code completes
/// the sign-up, activates the session, and creates the profile document.
#[derive(Default)]
pub struct SignUpScreen {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub code: String,
    pub pending_verification: bool,
    pub loading: bool,
    pub error: Option<String>,
    sign_up_id: Option<String>,
}

impl SignUpScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit the form: create the sign-up and request an email code.
    pub async fn submit(&mut self, ctx: &ScreenContext) {
        self.loading = true;
        self.error = None;

        let fields = SignUpFields {
            email_address: self.email.clone(),
            password: self.password.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        };

        match ctx.provider.sign_up_create(&fields).await {
            Ok(attempt) => match ctx.provider.prepare_email_verification(&attempt.id).await {
                Ok(()) => {
                    info!("verification code sent");
                    self.sign_up_id = Some(attempt.id);
                    self.pending_verification = true;
                }
                Err(e) => {
                    error!(error = %e, "Failed to request verification code");
                    self.error = Some(e.user_message(SIGN_UP_FALLBACK));
                }
            },
            Err(e) => {
                error!(error = %e, "Sign-up failed");
                self.error = Some(e.user_message(SIGN_UP_FALLBACK));
            }
        }

        self.loading = false;
    }

    /// Submit the emailed code.
    ///
    /// A `Complete` attempt activates the session, creates the profile from
    /// the form fields, and replaces navigation to home. A rejected code
    /// surfaces its message and keeps the verification phase open.
    pub async fn verify(&mut self, ctx: &ScreenContext) {
        let Some(sign_up_id) = self.sign_up_id.clone() else {
            debug!("verify called without a sign-up in progress");
            return;
        };

        self.loading = true;
        self.error = None;

        match ctx
            .provider
            .attempt_email_verification(&sign_up_id, &self.code)
            .await
        {
            Ok(attempt) if attempt.status.is_complete() => {
                match attempt.created_session_id.as_deref() {
                    Some(session_id) => match ctx.sessions.activate(session_id).await {
                        Ok(_) => {
                            let profile = UserProfile {
                                id: attempt.created_user_id.clone().unwrap_or_default(),
                                email: Some(self.email.clone()),
                                first_name: Some(self.first_name.clone()),
                                last_name: Some(self.last_name.clone()),
                            };
                            save_user_profile(ctx.profiles.as_ref(), &profile).await;

                            self.password.clear();
                            ctx.router.replace(Route::Home);
                        }
                        Err(e) => {
                            error!(error = %e, "Session activation failed");
                            self.error = Some(e.user_message(VERIFY_FALLBACK));
                        }
                    },
                    None => {
                        error!("complete verification carried no session id");
                        self.error = Some(VERIFY_FALLBACK.to_string());
                    }
                }
            }
            Ok(attempt) => {
                error!(status = ?attempt.status, "verification did not complete");
            }
            Err(e) => {
                error!(error = %e, "Verification failed");
                self.error = Some(e.user_message(VERIFY_FALLBACK));
            }
        }

        self.loading = false;
    }

    /// Run the Google OAuth handoff from the sign-up screen.
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
