use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized - session expired or token revoked")]
    Unauthorized,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data.
    /// The cut must land on a char boundary: error bodies are arbitrary
    /// server output and may be multibyte at the budget edge.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    /// Pull a human-readable message out of an error body. The server sends
    /// JSON with a `message` or `detail` field on most failures; fall back
    /// to the (truncated) raw body when it doesn't.
    pub fn extract_message(body: &str) -> String {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            for key in ["message", "detail", "error"] {
                if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                    return msg.to_string();
                }
            }
        }
        let trimmed = body.trim();
        if trimmed.is_empty() {
            "An error occurred".to_string()
        } else {
            Self::truncate_body(trimmed)
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::extract_message(body);
        match status.as_u16() {
            400 => ApiError::Validation(message),
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }

    /// Message suitable for showing directly to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::InvalidCredentials => "Invalid credentials".to_string(),
            ApiError::Unauthorized => "Session expired - please log in again".to_string(),
            ApiError::Validation(msg)
            | ApiError::Conflict(msg)
            | ApiError::NotFound(msg)
            | ApiError::ServerError(msg) => msg.clone(),
            ApiError::Network(_) | ApiError::InvalidResponse(_) => "An error occurred".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;

    #[test]
    fn maps_statuses_to_taxonomy() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message":"agenda too long"}"#),
            ApiError::Validation(m) if m == "agenda too long"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, r#"{"message":"username taken"}"#),
            ApiError::Conflict(m) if m == "username taken"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "missing"),
            ApiError::NotFound(m) if m == "missing"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::ServerError(m) if m == "boom"
        ));
    }

    #[test]
    fn extracts_server_message_variants() {
        assert_eq!(
            ApiError::extract_message(r#"{"detail":"Not found."}"#),
            "Not found."
        );
        assert_eq!(ApiError::extract_message("plain text"), "plain text");
        assert_eq!(ApiError::extract_message(""), "An error occurred");
    }

    #[test]
    fn truncates_oversized_bodies() {
        let body = "x".repeat(2000);
        let msg = ApiError::extract_message(&body);
        assert!(msg.len() < 600);
        assert!(msg.contains("truncated"));
    }

    #[test]
    fn truncates_multibyte_bodies_on_char_boundaries() {
        // 3 bytes per char, so the byte budget lands mid-character
        let body = "€".repeat(200);
        let msg = ApiError::extract_message(&body);
        assert!(msg.contains("truncated"));
        assert!(msg.contains("600 total bytes"));
        assert!(msg.starts_with('€'));

        let from_status = ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, &body);
        assert!(matches!(from_status, ApiError::ServerError(m) if m.contains("truncated")));
    }
}
