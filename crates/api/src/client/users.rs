//! User administration. Admin-only.

use tracing::instrument;

use maktaba_core::{Role, UserId};

use crate::error::ApiError;
use crate::types::{User, UsersPage};

use super::ApiClient;

/// Query parameters for the admin user listing.
#[derive(Debug, Clone, Default)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

impl ListUsersQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(role) = self.role {
            params.push(("role", role.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }
        params
    }
}

impl ApiClient {
    /// List registered users, optionally filtered by role.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn list_users(
        &self,
        token: &str,
        query: &ListUsersQuery,
    ) -> Result<UsersPage, ApiError> {
        self.execute(
            self.get("/api/v1/users")
                .bearer_auth(token)
                .query(&query.to_params()),
        )
        .await
    }

    /// Promote or demote a user.
    ///
    /// # Errors
    ///
    /// The backend rejects demoting the last admin; that surfaces as
    /// [`ApiError::Api`] with its message.
    #[instrument(skip(self, token), fields(user_id = %user_id, role = %role))]
    pub async fn update_user_role(
        &self,
        token: &str,
        user_id: &UserId,
        role: Role,
    ) -> Result<User, ApiError> {
        self.execute(
            self.put(&format!("/api/v1/users/{user_id}/role"))
                .bearer_auth(token)
                .json(&serde_json::json!({ "role": role })),
        )
        .await
    }

    /// Delete a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the token is
    /// rejected.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn delete_user(&self, token: &str, user_id: &UserId) -> Result<(), ApiError> {
        self.execute_empty(
            self.delete(&format!("/api/v1/users/{user_id}"))
                .bearer_auth(token),
        )
        .await
    }
}
