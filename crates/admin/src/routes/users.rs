//! User administration route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use maktaba_api::types::User;
use maktaba_api::{ApiError, ListUsersQuery};
use maktaba_core::{Role, UserId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::CurrentAdmin;
use crate::routes::ITEMS_PER_PAGE;
use crate::state::AppState;

/// Listing query parameters.
///
/// `role` stays a plain string so an empty filter submit (`role=`)
/// deserializes instead of turning into a 400.
#[derive(Debug, Deserialize)]
pub struct UsersListQuery {
    pub page: Option<u32>,
    pub role: Option<String>,
}

/// User listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub admin: Option<CurrentAdmin>,
    pub accounts: Vec<User>,
    pub roles: [Role; 2],
    pub selected_role: String,
    pub current_page: u32,
    pub has_more: bool,
    pub row_error: Option<String>,
}

/// A single user row fragment, swapped in place after a role change.
#[derive(Template, WebTemplate)]
#[template(path = "partials/user_row.html")]
pub struct UserRowTemplate {
    pub account: User,
    pub roles: [Role; 2],
    pub row_error: Option<String>,
}

/// Role change form data.
#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: Role,
}

/// Display the paged user listing.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Query(query): Query<UsersListQuery>,
) -> Result<UsersIndexTemplate> {
    let current_page = query.page.unwrap_or(1).max(1);
    let role_filter: Option<Role> = query.role.as_deref().and_then(|r| r.parse().ok());

    let list_query = ListUsersQuery {
        role: role_filter,
        limit: Some(ITEMS_PER_PAGE),
        skip: Some((current_page - 1) * ITEMS_PER_PAGE),
    };
    let accounts = state.api().list_users(&auth.token, &list_query).await?.users;
    let has_more = accounts.len() == ITEMS_PER_PAGE as usize;

    Ok(UsersIndexTemplate {
        admin: Some(auth.admin),
        accounts,
        roles: Role::ALL,
        selected_role: role_filter.map(|r| r.to_string()).unwrap_or_default(),
        current_page,
        has_more,
        row_error: None,
    })
}

/// Promote or demote a user, swapping the updated row back in.
///
/// The backend refuses some changes (demoting the last admin, for one);
/// those come back as the unchanged row with the message inline.
#[instrument(skip(state, auth, form), fields(user_id = %id))]
pub async fn update_role(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<UserId>,
    Form(form): Form<RoleForm>,
) -> Result<Response> {
    match state
        .api()
        .update_user_role(&auth.token, &id, form.role)
        .await
    {
        Ok(account) => Ok(UserRowTemplate {
            account,
            roles: Role::ALL,
            row_error: None,
        }
        .into_response()),
        Err(ApiError::Api { message, .. } | ApiError::Conflict(message)) => {
            let listing = state
                .api()
                .list_users(&auth.token, &ListUsersQuery::default())
                .await?;
            let account = listing
                .users
                .into_iter()
                .find(|u| u.id == id)
                .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

            Ok(UserRowTemplate {
                account,
                roles: Role::ALL,
                row_error: Some(message),
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a user account. The row disappears only on a success response.
#[instrument(skip(state, auth), fields(user_id = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<StatusCode> {
    state.api().delete_user(&auth.token, &id).await?;
    Ok(StatusCode::OK)
}
