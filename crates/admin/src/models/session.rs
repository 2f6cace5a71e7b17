//! Session-related types.

use serde::{Deserialize, Serialize};

use maktaba_core::{Email, UserId};

/// Session-stored admin identity.
///
/// Only stored after the role gate at login, so its presence implies the
/// admin role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's backend ID.
    pub id: UserId,
    /// Admin's display name.
    pub name: String,
    /// Admin's email address.
    pub email: Email,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the backend bearer token.
    pub const TOKEN: &str = "token";

    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
