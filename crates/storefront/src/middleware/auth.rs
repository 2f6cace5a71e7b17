//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a signed-in shopper in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// A signed-in shopper together with the bearer token backing their
/// session.
#[derive(Debug, Clone)]
pub struct Authed {
    pub user: CurrentUser,
    pub token: String,
}

/// Extractor that requires a signed-in shopper.
///
/// If the shopper is not logged in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(auth): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user.name)
/// }
/// ```
pub struct RequireUser(pub Authed);

/// Error returned when authentication is required but the shopper is not
/// logged in.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        // HX-Redirect makes HTMX fragment requests navigate the full page.
        let mut response = Redirect::to("/auth/login").into_response();
        if let Ok(value) = header::HeaderValue::from_str("/auth/login") {
            response.headers_mut().insert("HX-Redirect", value);
        }
        response
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(AuthRejection)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        let token: String = session
            .get(session_keys::TOKEN)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        Ok(Self(Authed { user, token }))
    }
}

/// Extractor that optionally gets the current shopper.
///
/// Unlike `RequireUser`, this does not reject the request if the shopper is
/// not logged in.
pub struct OptionalUser(pub Option<Authed>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match RequireUser::from_request_parts(parts, state).await {
            Ok(RequireUser(authed)) => Ok(Self(Some(authed))),
            Err(AuthRejection) => Ok(Self(None)),
        }
    }
}

/// Store the signed-in user and their bearer token in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in(
    session: &Session,
    token: &str,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::TOKEN, token).await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Clear the whole session (logout).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
