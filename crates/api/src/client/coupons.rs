//! Coupon management. Admin-only.

use tracing::instrument;

use maktaba_core::CouponId;

use crate::error::ApiError;
use crate::types::{Coupon, CouponInput};

use super::ApiClient;

impl ApiClient {
    /// List all coupons.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn list_coupons(&self, token: &str) -> Result<Vec<Coupon>, ApiError> {
        self.execute(self.get("/api/v1/coupons").bearer_auth(token))
            .await
    }

    /// Create a coupon.
    ///
    /// # Errors
    ///
    /// A duplicate code surfaces as [`ApiError::Conflict`].
    #[instrument(skip(self, token, input), fields(code = %input.code))]
    pub async fn create_coupon(&self, token: &str, input: &CouponInput) -> Result<Coupon, ApiError> {
        self.execute(self.post("/api/v1/coupons").bearer_auth(token).json(input))
            .await
    }

    /// Update a coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if the coupon does not exist or the new code
    /// collides.
    #[instrument(skip(self, token, input), fields(coupon_id = %coupon_id))]
    pub async fn update_coupon(
        &self,
        token: &str,
        coupon_id: &CouponId,
        input: &CouponInput,
    ) -> Result<Coupon, ApiError> {
        self.execute(
            self.put(&format!("/api/v1/coupons/{coupon_id}"))
                .bearer_auth(token)
                .json(input),
        )
        .await
    }

    /// Delete a coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if the coupon does not exist or the token is
    /// rejected.
    #[instrument(skip(self, token), fields(coupon_id = %coupon_id))]
    pub async fn delete_coupon(&self, token: &str, coupon_id: &CouponId) -> Result<(), ApiError> {
        self.execute_empty(
            self.delete(&format!("/api/v1/coupons/{coupon_id}"))
                .bearer_auth(token),
        )
        .await
    }

    /// Apply a coupon code to the shopper's cart; returns the recalculated
    /// cart.
    ///
    /// # Errors
    ///
    /// An unknown or expired code surfaces as [`ApiError::Api`] with the
    /// backend's message.
    #[instrument(skip(self, token), fields(code = %code))]
    pub async fn apply_coupon(&self, token: &str, code: &str) -> Result<crate::types::Cart, ApiError> {
        self.execute(
            self.post("/api/v1/cart/coupon")
                .bearer_auth(token)
                .json(&serde_json::json!({ "code": code })),
        )
        .await
    }
}
