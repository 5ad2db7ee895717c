use serde::Deserialize;
use thiserror::Error;

/// A structured error entry from the provider's error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderIssue {
    pub message: String,
    #[serde(rename = "longMessage")]
    pub long_message: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    errors: Vec<ProviderIssue>,
}

fn first_issue(issues: &[ProviderIssue]) -> &str {
    issues
        .first()
        .map(|i| i.message.as_str())
        .unwrap_or("no detail")
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Provider rejected the request: {}", first_issue(.0))]
    Rejected(Vec<ProviderIssue>),

    #[error("Unauthorized - session may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Provider server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("OAuth flow did not complete: {0}")]
    OAuthIncomplete(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl AuthError {
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

    /// Map a non-success HTTP response to an error.
    ///
    /// The provider reports flow problems (wrong password, duplicate email,
    /// bad verification code) as a structured `errors` array; when the body
    /// parses as one, the entries are kept so screens can show the first
    /// message verbatim. Anything else falls back to status-based mapping.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if let Ok(parsed) = serde_json::from_str::<ProviderErrorBody>(body) {
            if !parsed.errors.is_empty() {
                return AuthError::Rejected(parsed.errors);
            }
        }

        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => AuthError::Unauthorized,
            404 => AuthError::NotFound(truncated),
            500..=599 => AuthError::ServerError(truncated),
            _ => AuthError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// First structured provider message, if the provider sent any.
    pub fn first_provider_message(&self) -> Option<&str> {
        match self {
            AuthError::Rejected(issues) => issues.first().map(|i| i.message.as_str()),
            _ => None,
        }
    }

    /// Message to show the user: the provider's first structured message, or
    /// `fallback` when there is none.
    pub fn user_message(&self, fallback: &str) -> String {
        self.first_provider_message().unwrap_or(fallback).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_structured_errors_win_over_status_mapping() {
        let body = r#"{"errors":[{"message":"Password is incorrect.","longMessage":"Password is incorrect. Try again.","code":"form_password_incorrect"}]}"#;
        let error = AuthError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);

        assert_eq!(error.first_provider_message(), Some("Password is incorrect."));
        assert_eq!(
            error.user_message("Failed to sign in."),
            "Password is incorrect."
        );
    }

    #[test]
    fn test_first_of_several_issues_is_shown() {
        let body = r#"{"errors":[{"message":"Email is invalid."},{"message":"Password too short."}]}"#;
        let error = AuthError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(error.first_provider_message(), Some("Email is invalid."));
    }

    #[test]
    fn test_unstructured_body_falls_back_to_status() {
        let error = AuthError::from_status(StatusCode::UNAUTHORIZED, "nope");
        assert!(matches!(error, AuthError::Unauthorized));

        let error = AuthError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(error, AuthError::ServerError(_)));
    }

    #[test]
    fn test_user_message_uses_fallback_without_structured_errors() {
        let error = AuthError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(error.user_message("Failed to sign in."), "Failed to sign in.");
    }

    #[test]
    fn test_empty_errors_array_is_not_a_rejection() {
        let error = AuthError::from_status(StatusCode::BAD_REQUEST, r#"{"errors":[]}"#);
        assert!(matches!(error, AuthError::InvalidResponse(_)));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(2000);
        let error = AuthError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let message = error.to_string();
        assert!(message.contains("truncated, 2000 total bytes"));
        assert!(message.len() < 700);
    }

    #[test]
    fn test_truncation_respects_multibyte_boundaries() {
        let body = "é".repeat(600);
        let error = AuthError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        // Must not panic slicing mid-character, and still mention truncation.
        assert!(error.to_string().contains("truncated"));
    }
}
