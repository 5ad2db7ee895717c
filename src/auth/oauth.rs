//! OAuth completion resolution.
//!
//! The provider's completion shape is heterogeneous, so it is resolved once
//! here into a tagged outcome. Callers never have to know which side of the
//! handoff carried the user identity.

use super::types::OAuthCompletion;

/// Who finished the OAuth handoff.
#[derive(Debug, Clone, PartialEq)]
pub enum OAuthOutcome {
    /// The handoff created a brand-new account.
    NewUser {
        id: String,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    },
    /// An existing account signed in.
    ExistingUser { id: String },
}

/// A completion that produced a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOAuth {
    pub session_id: String,
    /// `None` when the completion exposed no user identity.
    pub outcome: Option<OAuthOutcome>,
}

/// Resolve a completion into its outcome.
///
/// Returns `None` when no session was created, which happens when the user
/// abandons the handoff in the browser. A new account takes precedence over
/// the sign-in echo when the provider populates both sides.
pub fn resolve_completion(completion: &OAuthCompletion) -> Option<ResolvedOAuth> {
    let session_id = completion.created_session_id.clone()?;

    let new_user = completion.sign_up.as_ref().and_then(|sign_up| {
        sign_up.created_user_id.as_ref().map(|id| OAuthOutcome::NewUser {
            id: id.clone(),
            email: sign_up.email_address.clone(),
            first_name: sign_up.first_name.clone(),
            last_name: sign_up.last_name.clone(),
        })
    });

    let outcome = new_user.or_else(|| {
        completion
            .sign_in
            .as_ref()
            .and_then(|sign_in| sign_in.user_data.as_ref())
            .map(|data| OAuthOutcome::ExistingUser { id: data.id.clone() })
    });

    Some(ResolvedOAuth { session_id, outcome })
}
