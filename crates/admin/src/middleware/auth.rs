//! Authentication middleware and extractors for the admin console.
//!
//! The role gate lives at login: a `CurrentAdmin` only enters the session
//! after the backend reports the admin role, so every extractor here just
//! checks for its presence.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// A signed-in admin together with the bearer token backing their session.
#[derive(Debug, Clone)]
pub struct AuthedAdmin {
    pub admin: CurrentAdmin,
    pub token: String,
}

/// Extractor that requires admin authentication.
///
/// If no admin is logged in, returns a redirect to the login page.
pub struct RequireAdmin(pub AuthedAdmin);

/// Error returned when admin authentication is required but missing.
pub struct AdminAuthRejection;

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        let mut response = Redirect::to("/auth/login").into_response();
        if let Ok(value) = header::HeaderValue::from_str("/auth/login") {
            response.headers_mut().insert("HX-Redirect", value);
        }
        response
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or(AdminAuthRejection)?;

        let token: String = session
            .get(session_keys::TOKEN)
            .await
            .ok()
            .flatten()
            .ok_or(AdminAuthRejection)?;

        Ok(Self(AuthedAdmin { admin, token }))
    }
}

/// Store the signed-in admin and their bearer token in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in_admin(
    session: &Session,
    token: &str,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::TOKEN, token).await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Clear the whole session (logout).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn sign_out_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
