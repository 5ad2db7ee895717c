//! Scriptable identity provider double.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::client::IdentityProvider;
use super::error::{AuthError, ProviderIssue};
use super::types::{
    ActiveSession, AuthUser, OAuthCompletion, OAuthProvider, SignInAttempt, SignUpAttempt,
    SignUpFields,
};

/// Identity provider driven by pre-programmed responses.
///
/// Script one flow call at a time: set the attempt (or error) a method
/// should produce, run the code under test, then inspect the recorded
/// calls. Unscripted flow calls fail with `InvalidResponse`.
#[derive(Default)]
pub struct FakeProvider {
    /// Next password sign-in result.
    pub sign_in_attempt: Mutex<Option<SignInAttempt>>,
    /// Next sign-up creation result.
    pub sign_up_attempt: Mutex<Option<SignUpAttempt>>,
    /// Next verification result.
    pub verification_attempt: Mutex<Option<SignUpAttempt>>,
    /// Next OAuth completion.
    pub oauth_completion: Mutex<Option<OAuthCompletion>>,
    /// Error the next flow call fails with, consumed on use.
    pub next_error: Mutex<Option<AuthError>>,
    /// Sessions available for activation, by session id.
    pub activations: Mutex<HashMap<String, ActiveSession>>,
    /// Users behind restorable tokens.
    pub restorable: Mutex<HashMap<String, AuthUser>>,
    /// Sign-up ids that had a verification email prepared.
    pub prepared: Mutex<Vec<String>>,
    /// Fields passed to the last sign-up creation.
    pub last_sign_up_fields: Mutex<Option<SignUpFields>>,
    /// Codes passed to verification attempts.
    pub verification_codes: Mutex<Vec<String>>,
    /// Tokens passed to sign-out.
    pub revoked: Mutex<Vec<String>>,
    restore_broken: AtomicBool,
}

impl FakeProvider {
    /// Fail the next flow call with a structured provider rejection.
    pub fn reject_with(&self, message: &str) {
        *self.next_error.lock().unwrap() = Some(AuthError::Rejected(vec![ProviderIssue {
            message: message.to_string(),
            long_message: None,
            code: None,
        }]));
    }

    /// Fail the next flow call with an arbitrary error.
    pub fn fail_with(&self, error: AuthError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    /// Make `restore_session` fail outright.
    pub fn fail_restore(&self) {
        self.restore_broken.store(true, Ordering::SeqCst);
    }

    pub fn add_activation(&self, session_id: &str, token: &str, user: AuthUser) {
        self.activations.lock().unwrap().insert(
            session_id.to_string(),
            ActiveSession {
                token: token.to_string(),
                user,
            },
        );
    }

    pub fn add_restorable(&self, token: &str, user: AuthUser) {
        self.restorable
            .lock()
            .unwrap()
            .insert(token.to_string(), user);
    }

    fn take_error(&self) -> Option<AuthError> {
        self.next_error.lock().unwrap().take()
    }

    fn unscripted(what: &str) -> AuthError {
        AuthError::InvalidResponse(format!("no scripted {}", what))
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn sign_in_create(
        &self,
        _identifier: &str,
        _password: &str,
    ) -> Result<SignInAttempt, AuthError> {
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        self.sign_in_attempt
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::unscripted("sign-in"))
    }

    async fn sign_up_create(&self, fields: &SignUpFields) -> Result<SignUpAttempt, AuthError> {
        *self.last_sign_up_fields.lock().unwrap() = Some(fields.clone());
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        self.sign_up_attempt
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::unscripted("sign-up"))
    }

    async fn prepare_email_verification(&self, sign_up_id: &str) -> Result<(), AuthError> {
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        self.prepared.lock().unwrap().push(sign_up_id.to_string());
        Ok(())
    }

    async fn attempt_email_verification(
        &self,
        _sign_up_id: &str,
        code: &str,
    ) -> Result<SignUpAttempt, AuthError> {
        self.verification_codes.lock().unwrap().push(code.to_string());
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        self.verification_attempt
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::unscripted("verification"))
    }

    async fn start_oauth(&self, _provider: OAuthProvider) -> Result<OAuthCompletion, AuthError> {
        if let Some(e) = self.take_error() {
            return Err(e);
        }
        self.oauth_completion
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::unscripted("OAuth completion"))
    }

    async fn activate_session(&self, session_id: &str) -> Result<ActiveSession, AuthError> {
        self.activations
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| Self::unscripted("session activation"))
    }

    async fn restore_session(&self, token: &str) -> Result<Option<ActiveSession>, AuthError> {
        if self.restore_broken.load(Ordering::SeqCst) {
            return Err(AuthError::ServerError("restore unavailable".to_string()));
        }
        Ok(self
            .restorable
            .lock()
            .unwrap()
            .get(token)
            .map(|user| ActiveSession {
                token: token.to_string(),
                user: user.clone(),
            }))
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        self.revoked.lock().unwrap().push(token.to_string());
        Ok(())
    }
}
