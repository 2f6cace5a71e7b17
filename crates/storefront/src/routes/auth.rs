//! Authentication route handlers.
//!
//! Login exchanges credentials with the backend for a bearer token.
//! Registration is a two-step one-time-passcode flow: the backend emails a
//! code, the visitor types it in, and only then does the account exist.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use maktaba_api::ApiError;

use crate::error::Result;
use crate::filters;
use crate::middleware::{OptionalUser, sign_in, sign_out};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Passcode form data.
#[derive(Debug, Deserialize)]
pub struct OtpForm {
    pub otp: String,
}

/// Login page query parameters.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub registered: Option<bool>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<CurrentUser>,
    pub email: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub user: Option<CurrentUser>,
    pub name: String,
    pub email: String,
    pub error: Option<String>,
}

/// Passcode entry page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/verify_otp.html")]
pub struct VerifyOtpTemplate {
    pub user: Option<CurrentUser>,
    pub email: String,
    pub error: Option<String>,
}

/// Display the login page.
#[instrument(skip(user))]
pub async fn login_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<LoginQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }

    let notice = query
        .registered
        .filter(|&r| r)
        .map(|_| "Account verified. You can sign in now.".to_string());

    LoginTemplate {
        user: None,
        email: String::new(),
        error: None,
        notice,
    }
    .into_response()
}

/// Handle a login attempt.
///
/// Admins are sent to the admin console; everyone else goes home. Bad
/// credentials re-render the form with an inline message rather than
/// tearing down the (anonymous) session.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return Ok(login_error(email, "Email and password are required").into_response());
    }

    let response = match state.api().login(email, &form.password).await {
        Ok(response) => response,
        Err(ApiError::Unauthorized) => {
            return Ok(login_error(email, "Invalid email or password").into_response());
        }
        Err(ApiError::Api { message, .. }) => {
            return Ok(login_error(email, &message).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let backend_user = response.user;
    let Ok(parsed_email) = maktaba_core::Email::parse(&backend_user.email) else {
        return Ok(login_error(email, "Invalid email or password").into_response());
    };
    let current = CurrentUser {
        id: backend_user.id,
        name: backend_user.name,
        email: parsed_email,
        role: backend_user.role,
    };
    let is_admin = current.role.is_admin();

    sign_in(&session, &response.token, &current).await?;
    tracing::info!(user_id = %current.id, "User signed in");

    let destination = if is_admin {
        state.config().admin_console_url.clone()
    } else {
        "/".to_string()
    };
    Ok(Redirect::to(&destination).into_response())
}

/// Display the registration page.
#[instrument(skip(user))]
pub async fn register_page(OptionalUser(user): OptionalUser) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }

    RegisterTemplate {
        user: None,
        name: String::new(),
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Start registration: ask the backend to email a one-time passcode.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let name = form.name.trim();
    let email = form.email.trim();

    if name.is_empty() || email.is_empty() || form.password.is_empty() {
        return Ok(RegisterTemplate {
            user: None,
            name: name.to_string(),
            email: email.to_string(),
            error: Some("All fields are required".to_string()),
        }
        .into_response());
    }

    match state.api().send_otp(name, email, &form.password).await {
        Ok(_) => {
            session
                .insert(session_keys::PENDING_OTP_EMAIL, email)
                .await?;
            Ok(Redirect::to("/auth/verify-otp").into_response())
        }
        Err(ApiError::Conflict(message) | ApiError::Api { message, .. }) => Ok(RegisterTemplate {
            user: None,
            name: name.to_string(),
            email: email.to_string(),
            error: Some(message),
        }
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Display the passcode entry page.
#[instrument(skip(session))]
pub async fn verify_otp_page(session: Session) -> Result<Response> {
    let email: Option<String> = session.get(session_keys::PENDING_OTP_EMAIL).await?;

    let Some(email) = email else {
        return Ok(Redirect::to("/auth/register").into_response());
    };

    Ok(VerifyOtpTemplate {
        user: None,
        email,
        error: None,
    }
    .into_response())
}

/// Complete registration with the emailed passcode.
#[instrument(skip(state, session, form))]
pub async fn verify_otp(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OtpForm>,
) -> Result<Response> {
    let email: Option<String> = session.get(session_keys::PENDING_OTP_EMAIL).await?;
    let Some(email) = email else {
        return Ok(Redirect::to("/auth/register").into_response());
    };

    let otp = form.otp.trim();
    if otp.is_empty() {
        return Ok(VerifyOtpTemplate {
            user: None,
            email,
            error: Some("Enter the code from your email".to_string()),
        }
        .into_response());
    }

    match state.api().verify_otp(&email, otp).await {
        Ok(_) => {
            session
                .remove::<String>(session_keys::PENDING_OTP_EMAIL)
                .await?;
            Ok(Redirect::to("/auth/login?registered=true").into_response())
        }
        Err(ApiError::Unauthorized) => Ok(VerifyOtpTemplate {
            user: None,
            email,
            error: Some("That code is wrong or has expired".to_string()),
        }
        .into_response()),
        Err(ApiError::Api { message, .. }) => Ok(VerifyOtpTemplate {
            user: None,
            email,
            error: Some(message),
        }
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Handle logout: wipe the whole session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    sign_out(&session).await?;
    Ok(Redirect::to("/"))
}

fn login_error(email: &str, message: &str) -> LoginTemplate {
    LoginTemplate {
        user: None,
        email: email.to_string(),
        error: Some(message.to_string()),
        notice: None,
    }
}
