use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::AuthUser;

use super::store::ProfileStore;

/// Profile fields proposed at sign-in or sign-up time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    #[serde(rename = "externalId")]
    pub id: String,
    pub email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

impl UserProfile {
    /// Profile for an authenticated user object.
    pub fn from_user(user: &AuthUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email_address.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }

    /// Profile carrying only the identity id.
    pub fn id_only(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            first_name: None,
            last_name: None,
        }
    }
}

/// Create the user's profile document if it does not exist yet.
///
/// Write-once: an existing document is left untouched, whatever this call
/// proposes. An empty id is a no-op without any store traffic. The function
/// never fails; profile persistence is best-effort relative to the auth
/// flow it rides along with, so every store error is logged and swallowed.
pub async fn save_user_profile(store: &dyn ProfileStore, profile: &UserProfile) {
    if profile.id.is_empty() {
        debug!("skipping profile save for empty user id");
        return;
    }

    match store.fetch(&profile.id).await {
        Ok(Some(_)) => {
            debug!(user = %profile.id, "profile already exists");
        }
        Ok(None) => match store.create(profile).await {
            Ok(()) => info!(user = %profile.id, "user profile created"),
            Err(e) => warn!(user = %profile.id, error = %e, "Failed to create user profile"),
        },
        Err(e) => {
            warn!(user = %profile.id, error = %e, "Failed to look up user profile");
        }
    }
}
