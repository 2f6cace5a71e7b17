//! Session-related types.
//!
//! Types stored in the session for authentication and checkout state.

use serde::{Deserialize, Serialize};

use maktaba_core::{Email, OrderId, Role, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// User's display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Account role.
    pub role: Role,
}

/// Outcome of a successful checkout, stashed between the payment call and
/// the success page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOutcome {
    /// The order that was paid.
    pub order_id: OrderId,
    /// Confirmation message from the backend.
    pub message: String,
    /// Raw payment-provider payload, shown on the success page.
    pub provider_response: Option<serde_json::Value>,
}

/// Session keys for authentication and checkout data.
pub mod keys {
    /// Key for the backend bearer token.
    pub const TOKEN: &str = "token";

    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the most recently created order id.
    pub const LAST_ORDER_ID: &str = "last_order_id";

    /// Key for the stashed checkout outcome.
    pub const CHECKOUT_OUTCOME: &str = "checkout_outcome";

    /// Key for the email awaiting one-time-passcode verification.
    pub const PENDING_OTP_EMAIL: &str = "pending_otp_email";
}
