//! Authentication against the hosted identity provider.
//!
//! This module provides:
//! - `IdentityProvider`: the port for the provider's client API, implemented
//!   over HTTP by `HttpIdentityClient`
//! - `SessionManager` / `AuthSnapshot`: process-wide session state with
//!   watch-based change notification
//! - `resolve_completion`: OAuth completion resolution into a tagged outcome
//! - `AuthError`: provider errors, keeping the structured messages screens
//!   show to users

pub mod client;
pub mod error;
pub mod oauth;
pub mod session;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use client::{HttpIdentityClient, IdentityProvider};
pub use error::{AuthError, ProviderIssue};
pub use oauth::{resolve_completion, OAuthOutcome, ResolvedOAuth};
pub use session::{AuthSnapshot, SessionManager, SESSION_TOKEN_KEY};
pub use types::{
    ActiveSession, AuthUser, FlowStatus, OAuthCompletion, OAuthProvider, SignInAttempt,
    SignUpAttempt, SignUpFields, UserData,
};
