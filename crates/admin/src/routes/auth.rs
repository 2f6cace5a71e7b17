//! Sign-in and sign-out for the admin console.
//!
//! The console talks to the same credential endpoint as the storefront,
//! but only accounts carrying the admin role get a session here. A
//! shopper account is turned away with an inline message before anything
//! touches the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use maktaba_api::ApiError;

use crate::error::Result;
use crate::filters;
use crate::middleware::{sign_in_admin, sign_out_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Sign-in form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub admin: Option<CurrentAdmin>,
    pub email: String,
    pub error: Option<String>,
}

/// Display the sign-in page.
#[instrument]
pub async fn login_page() -> LoginTemplate {
    LoginTemplate {
        admin: None,
        email: String::new(),
        error: None,
    }
}

/// Handle a sign-in attempt, admitting only admin accounts.
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

    let account = response.user;
    if !account.role.is_admin() {
        tracing::warn!(user_id = %account.id, "Non-admin sign-in rejected");
        return Ok(
            login_error(email, "This account does not have admin access").into_response(),
        );
    }

    let Ok(parsed_email) = maktaba_core::Email::parse(&account.email) else {
        return Ok(login_error(email, "Invalid email or password").into_response());
    };
    let admin = CurrentAdmin {
        id: account.id,
        name: account.name,
        email: parsed_email,
    };

    sign_in_admin(&session, &response.token, &admin).await?;
    tracing::info!(admin_id = %admin.id, "Admin signed in");

    Ok(Redirect::to("/").into_response())
}

/// Handle sign-out: wipe the whole session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    sign_out_admin(&session).await?;
    Ok(Redirect::to("/auth/login"))
}

fn login_error(email: &str, message: &str) -> LoginTemplate {
    LoginTemplate {
        admin: None,
        email: email.to_string(),
        error: Some(message.to_string()),
    }
}
