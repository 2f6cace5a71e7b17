//! Error taxonomy for backend calls.

use thiserror::Error;

/// Errors returned by [`crate::ApiClient`] methods.
///
/// The variants mirror how the frontends react to a failed call:
/// `Unauthorized` forces a session reset, `Conflict` becomes an inline
/// "already exists" message, and everything else is surfaced verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, TLS).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the bearer token (HTTP 401).
    ///
    /// The session is invalid; the caller must clear it and re-login.
    #[error("session invalid")]
    Unauthorized,

    /// The request conflicts with existing state (HTTP 409),
    /// e.g. a duplicate coupon code.
    #[error("{0}")]
    Conflict(String),

    /// Any other non-success response, with the backend's error message
    /// when one was provided.
    #[error("{message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Error message from the response body, or a generic fallback.
        message: String,
    },

    /// The response body was not the JSON shape we expected.
    #[error("unexpected response body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether this error means the stored session token is no longer valid.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Whether this error is a conflict (duplicate record).
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Shape of the backend's error body, e.g. `{"error": "Coupon code already exists."}`.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Classify a non-success response into an [`ApiError`].
pub(crate) fn classify_response(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| format!("backend returned HTTP {status}"));

    match status {
        401 => ApiError::Unauthorized,
        409 => ApiError::Conflict(message),
        _ => ApiError::Api { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_is_unauthorized_regardless_of_body() {
        let err = classify_response(401, "{\"error\":\"jwt expired\"}");
        assert!(err.is_unauthorized());

        let err = classify_response(401, "not json");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_409_carries_backend_message() {
        let err = classify_response(409, "{\"error\":\"Coupon code already exists.\"}");
        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "Coupon code already exists.");
    }

    #[test]
    fn test_other_statuses_become_api_errors() {
        let err = classify_response(400, "{\"error\":\"qty must be >= 1\"}");
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "qty must be >= 1");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_message_field_used_when_error_absent() {
        let err = classify_response(500, "{\"message\":\"boom\"}");
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_unparseable_body_gets_generic_message() {
        let err = classify_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), "backend returned HTTP 502");
    }
}
