use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::upsert::UserProfile;

/// HTTP request timeout in seconds.
/// Profile writes ride along with auth flows, so fail fast.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Store server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProfileError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 | 403 => ProfileError::AccessDenied(truncated),
            500..=599 => ProfileError::ServerError(truncated),
            _ => ProfileError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

/// A stored profile document. `created_at` is stamped by the store on
/// create, never by this client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(rename = "externalId")]
    pub external_id: String,
    pub email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Document-store port for the `users` collection.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile document for an identity id, `None` when absent.
    async fn fetch(&self, id: &str) -> Result<Option<ProfileRecord>, ProfileError>;

    /// Create the profile document.
    async fn create(&self, profile: &UserProfile) -> Result<(), ProfileError>;
}

/// REST client for the profile document store.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpProfileStore {
    client: Client,
    base_url: String,
}

impl HttpProfileStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProfileError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn user_url(&self, id: &str) -> String {
        format!("{}/users/{}", self.base_url, id)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ProfileError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ProfileError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl ProfileStore for HttpProfileStore {
    async fn fetch(&self, id: &str) -> Result<Option<ProfileRecord>, ProfileError> {
        let response = self.client.get(self.user_url(id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::check_response(response).await?;
        Ok(Some(response.json().await?))
    }

    async fn create(&self, profile: &UserProfile) -> Result<(), ProfileError> {
        let response = self
            .client
            .put(self.user_url(&profile.id))
            .json(profile)
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_parses_wire_names() {
        let json = r#"{
            "externalId": "user_1",
            "email": "ada@example.com",
            "firstName": "Ada",
            "createdAt": "2025-06-01T12:00:00Z"
        }"#;

        let record: ProfileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.external_id, "user_1");
        assert_eq!(record.first_name.as_deref(), Some("Ada"));
        assert!(record.created_at.is_some());
        assert_eq!(record.last_name, None);
    }

    #[test]
    fn test_access_errors_map_to_access_denied() {
        let error = ProfileError::from_status(StatusCode::FORBIDDEN, "denied");
        assert!(matches!(error, ProfileError::AccessDenied(_)));
    }
}
