use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The session has been invalidated (missing or rejected refresh token).
    /// The caller must send the user back through login.
    #[error("Authentication required - please log in again")]
    AuthenticationRequired,

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data.
    /// Server bodies are arbitrary UTF-8, so the cut must land on a char
    /// boundary rather than a fixed byte offset.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_short_body_kept_verbatim() {
        let err = ApiError::from_status(StatusCode::FORBIDDEN, "nope");
        assert!(matches!(err, ApiError::AccessDenied(body) if body == "nope"));
    }

    #[test]
    fn test_long_ascii_body_truncated() {
        let body = "x".repeat(2 * MAX_ERROR_BODY_LENGTH);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let ApiError::ServerError(message) = err else {
            panic!("expected ServerError");
        };
        assert!(message.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(message.contains("truncated"));
        assert!(message.contains(&format!("{} total bytes", body.len())));
    }

    #[test]
    fn test_multibyte_body_truncates_on_char_boundary() {
        // 200 three-byte characters: byte 500 falls inside a character
        let body = "한".repeat(200);
        let err = ApiError::from_status(StatusCode::FORBIDDEN, &body);
        let ApiError::AccessDenied(message) = err else {
            panic!("expected AccessDenied");
        };
        // 498 is the last char boundary at or below the limit
        assert!(message.starts_with(&"한".repeat(166)));
        assert!(!message.starts_with(&"한".repeat(167)));
        assert!(message.contains("truncated, 600 total bytes"));
    }
}
