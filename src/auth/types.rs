//! Wire types for the identity provider's client API.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a sign-in or sign-up flow.
///
/// Only `Complete` is load-bearing: it means the provider created a session.
/// Every other status leaves the flow on its current screen. Statuses this
/// client does not know about deserialize as `Unknown` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    Complete,
    NeedsFirstFactor,
    MissingRequirements,
    Abandoned,
    #[serde(other)]
    Unknown,
}

impl FlowStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, FlowStatus::Complete)
    }
}

/// User fields the provider echoes on an existing-user OAuth sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub id: String,
    #[serde(rename = "emailAddress")]
    pub email_address: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

/// State of a sign-in flow after an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInAttempt {
    pub id: String,
    pub status: FlowStatus,
    #[serde(rename = "createdSessionId")]
    pub created_session_id: Option<String>,
    #[serde(rename = "userData")]
    pub user_data: Option<UserData>,
}

/// State of a sign-up flow after an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpAttempt {
    pub id: String,
    pub status: FlowStatus,
    #[serde(rename = "createdSessionId")]
    pub created_session_id: Option<String>,
    #[serde(rename = "createdUserId")]
    pub created_user_id: Option<String>,
    #[serde(rename = "emailAddress")]
    pub email_address: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

/// Fields collected by the sign-up form.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpFields {
    #[serde(rename = "emailAddress")]
    pub email_address: String,
    pub password: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

/// Supported OAuth brokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    /// Provider slug as used in API paths.
    pub fn slug(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
        }
    }
}

/// Terminal state of an OAuth handoff.
///
/// The provider reports the two ways a handoff can finish through different
/// fields: a brand-new account carries its identity on `sign_up`, an
/// existing account echoes the user on `sign_in`. Either way the session, if
/// one was created, is in `created_session_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCompletion {
    #[serde(rename = "createdSessionId")]
    pub created_session_id: Option<String>,
    #[serde(rename = "signIn")]
    pub sign_in: Option<SignInAttempt>,
    #[serde(rename = "signUp")]
    pub sign_up: Option<SignUpAttempt>,
}

/// The authenticated user as the rest of the app sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(rename = "emailAddress")]
    pub email_address: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

/// An activated session: the client token plus the user behind it.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveSession {
    pub token: String,
    pub user: AuthUser,
}
