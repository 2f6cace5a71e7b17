//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use maktaba_api::ApiError;

/// Response-extension marker set when the backend rejected the session's
/// bearer token. The session guard middleware clears the session when it
/// sees this on the way out.
#[derive(Debug, Clone, Copy)]
pub struct SessionInvalidated;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API operation failed.
    #[error("Backend error: {0}")]
    Api(ApiError),

    /// The backend rejected the session's bearer token.
    #[error("Session expired")]
    SessionExpired,

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        // A 401 from any endpoint means the stored token is no longer
        // valid; every screen funnels into the same session teardown.
        if err.is_unauthorized() {
            Self::SessionExpired
        } else {
            Self::Api(err)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::SessionExpired = self {
            return session_expired_response();
        }

        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Api(ApiError::Http(_) | ApiError::Parse(_)) | Self::Internal(_) | Self::Session(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Api(err) => match err {
                ApiError::Conflict(_) => StatusCode::CONFLICT,
                ApiError::Api { status, .. } => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                ApiError::Http(_) | ApiError::Parse(_) => StatusCode::BAD_GATEWAY,
                ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SessionExpired => StatusCode::SEE_OTHER,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) | Self::Session(_) => "Internal server error".to_string(),
            Self::Api(err) => match err {
                ApiError::Http(_) | ApiError::Parse(_) => "External service error".to_string(),
                ApiError::Conflict(msg) => msg.clone(),
                ApiError::Api { message, .. } => message.clone(),
                ApiError::Unauthorized => "Please sign in".to_string(),
            },
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Redirect to the sign-in page and flag the session for teardown.
///
/// The `HX-Redirect` header makes HTMX fragment requests navigate the whole
/// page instead of swapping the redirect body into a fragment slot.
fn session_expired_response() -> Response {
    let mut response = Redirect::to("/auth/login").into_response();
    response.extensions_mut().insert(SessionInvalidated);
    if let Ok(value) = header::HeaderValue::from_str("/auth/login") {
        response.headers_mut().insert("HX-Redirect", value);
    }
    response
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("book-123".to_string());
        assert_eq!(err.to_string(), "Not found: book-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_unauthorized_becomes_session_expired() {
        let err = AppError::from(ApiError::Unauthorized);
        assert!(matches!(err, AppError::SessionExpired));
    }

    #[test]
    fn test_session_expired_redirects_and_marks_response() {
        let response = AppError::SessionExpired.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.extensions().get::<SessionInvalidated>().is_some());
        assert_eq!(
            response.headers().get("HX-Redirect").map(|v| v.as_bytes()),
            Some(b"/auth/login".as_slice())
        );
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = AppError::from(ApiError::Conflict("Coupon code already exists".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
