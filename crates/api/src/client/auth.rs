//! Credential exchange and the one-time-passcode registration flow.

use tracing::instrument;

use crate::error::ApiError;
use crate::types::{LoginResponse, MessageResponse};

use super::ApiClient;

impl ApiClient {
    /// Exchange credentials for a bearer token and user record.
    ///
    /// # Errors
    ///
    /// Rejected credentials surface as [`ApiError::Unauthorized`].
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.execute(self.post("/api/v1/auth/login").json(&serde_json::json!({
            "email": email,
            "password": password,
        })))
        .await
    }

    /// Start registration: the backend emails a one-time passcode.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is already registered or the
    /// request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn send_otp(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.execute(self.post("/api/v1/auth/send-otp").json(&serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        })))
        .await
    }

    /// Complete registration with the emailed passcode.
    ///
    /// # Errors
    ///
    /// Returns an error if the passcode is wrong or expired.
    #[instrument(skip(self, otp), fields(email = %email))]
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<MessageResponse, ApiError> {
        self.execute(self.post("/api/v1/auth/verify-otp").json(&serde_json::json!({
            "email": email,
            "otp": otp,
        })))
        .await
    }
}
