//! HTTP client for the identity provider's client API.
//!
//! This module defines `IdentityProvider`, the port the rest of the app
//! consumes, and `HttpIdentityClient`, the reqwest-backed implementation
//! talking to the hosted provider.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::error::AuthError;
use super::types::{
    ActiveSession, AuthUser, OAuthCompletion, OAuthProvider, SignInAttempt, SignUpAttempt,
    SignUpFields,
};

/// HTTP request timeout in seconds.
/// 30s allows for slow provider responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Header carrying the publishable key on every request
const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-key";

/// Seconds between polls while an OAuth handoff sits with the browser.
/// 2s keeps the wait short without hammering the provider.
const OAUTH_POLL_INTERVAL_SECS: u64 = 2;

/// Give up on an OAuth handoff after this many seconds.
/// 5 minutes covers account pickers and consent screens comfortably.
const OAUTH_POLL_TIMEOUT_SECS: u64 = 300;

/// Operations consumed from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a password sign-in attempt for `identifier`.
    async fn sign_in_create(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<SignInAttempt, AuthError>;

    /// Create a sign-up from the collected form fields.
    async fn sign_up_create(&self, fields: &SignUpFields) -> Result<SignUpAttempt, AuthError>;

    /// Ask the provider to email a verification code for the sign-up.
    async fn prepare_email_verification(&self, sign_up_id: &str) -> Result<(), AuthError>;

    /// Submit the emailed code. A `Complete` attempt carries the session.
    async fn attempt_email_verification(
        &self,
        sign_up_id: &str,
        code: &str,
    ) -> Result<SignUpAttempt, AuthError>;

    /// Run the hosted OAuth handoff for `provider` to its terminal state.
    async fn start_oauth(&self, provider: OAuthProvider) -> Result<OAuthCompletion, AuthError>;

    /// Make the session current, returning its client token and user.
    async fn activate_session(&self, session_id: &str) -> Result<ActiveSession, AuthError>;

    /// Restore a session from a cached client token. `None` means the token
    /// no longer maps to a live session.
    async fn restore_session(&self, token: &str) -> Result<Option<ActiveSession>, AuthError>;

    /// End the session behind `token`.
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;
}

#[derive(Debug, Deserialize)]
struct OAuthHandoff {
    id: String,
    #[serde(rename = "verificationUrl")]
    verification_url: String,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum HandoffStatus {
    Pending,
    Complete,
    Failed,
}

#[derive(Deserialize)]
struct OAuthPollResponse {
    status: HandoffStatus,
    #[serde(flatten)]
    completion: OAuthCompletion,
}

/// Identity client for the hosted provider.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpIdentityClient {
    client: Client,
    base_url: String,
    publishable_key: String,
}

impl HttpIdentityClient {
    pub fn new(
        base_url: impl Into<String>,
        publishable_key: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            publishable_key: publishable_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, AuthError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(AuthError::from_status(status, &body))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AuthError> {
        let response = self
            .client
            .get(self.url(path))
            .header(PUBLISHABLE_KEY_HEADER, &self.publishable_key)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .header(PUBLISHABLE_KEY_HEADER, &self.publishable_key)
            .json(body)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityClient {
    async fn sign_in_create(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<SignInAttempt, AuthError> {
        self.post_json(
            "/sign_ins",
            &json!({ "identifier": identifier, "password": password }),
        )
        .await
    }

    async fn sign_up_create(&self, fields: &SignUpFields) -> Result<SignUpAttempt, AuthError> {
        self.post_json("/sign_ups", fields).await
    }

    async fn prepare_email_verification(&self, sign_up_id: &str) -> Result<(), AuthError> {
        let path = format!("/sign_ups/{}/prepare_verification", sign_up_id);
        let response = self
            .client
            .post(self.url(&path))
            .header(PUBLISHABLE_KEY_HEADER, &self.publishable_key)
            .json(&json!({ "strategy": "email_code" }))
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }

    async fn attempt_email_verification(
        &self,
        sign_up_id: &str,
        code: &str,
    ) -> Result<SignUpAttempt, AuthError> {
        let path = format!("/sign_ups/{}/attempt_verification", sign_up_id);
        self.post_json(&path, &json!({ "strategy": "email_code", "code": code }))
            .await
    }

    /// Start the hosted handoff, surface the verification URL, then poll
    /// until the provider reports a terminal state or the deadline passes.
    async fn start_oauth(&self, provider: OAuthProvider) -> Result<OAuthCompletion, AuthError> {
        let handoff: OAuthHandoff = self
            .post_json(&format!("/oauth/{}/start", provider.slug()), &json!({}))
            .await?;

        info!(url = %handoff.verification_url, provider = provider.slug(), "Complete the sign-in in your browser");

        let deadline = Instant::now() + Duration::from_secs(OAUTH_POLL_TIMEOUT_SECS);
        loop {
            let poll: OAuthPollResponse = self
                .get_json(&format!("/oauth/attempts/{}", handoff.id))
                .await?;

            match poll.status {
                HandoffStatus::Complete => return Ok(poll.completion),
                HandoffStatus::Failed => {
                    return Err(AuthError::OAuthIncomplete(
                        "provider reported failure".to_string(),
                    ))
                }
                HandoffStatus::Pending => {
                    if Instant::now() >= deadline {
                        return Err(AuthError::OAuthIncomplete(
                            "timed out waiting for the browser".to_string(),
                        ));
                    }
                    tokio::time::sleep(Duration::from_secs(OAUTH_POLL_INTERVAL_SECS)).await;
                }
            }
        }
    }

    async fn activate_session(&self, session_id: &str) -> Result<ActiveSession, AuthError> {
        let path = format!("/sessions/{}/activate", session_id);
        self.post_json(&path, &json!({})).await
    }

    async fn restore_session(&self, token: &str) -> Result<Option<ActiveSession>, AuthError> {
        let response = self
            .client
            .get(self.url("/me"))
            .header(PUBLISHABLE_KEY_HEADER, &self.publishable_key)
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("cached session token no longer valid");
            return Ok(None);
        }

        let response = Self::check_response(response).await?;
        let user: AuthUser = response.json().await?;
        Ok(Some(ActiveSession {
            token: token.to_string(),
            user,
        }))
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.url("/sign_out"))
            .header(PUBLISHABLE_KEY_HEADER, &self.publishable_key)
            .bearer_auth(token)
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }
}
