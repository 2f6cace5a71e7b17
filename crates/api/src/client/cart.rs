//! Server-side cart operations. Every call needs the shopper's token.

use tracing::instrument;

use maktaba_core::BookId;

use crate::error::ApiError;
use crate::types::Cart;

use super::ApiClient;

impl ApiClient {
    /// Fetch the shopper's cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the token is invalid.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &str) -> Result<Cart, ApiError> {
        self.execute(self.get("/api/v1/cart").bearer_auth(token))
            .await
    }

    /// Add `qty` copies of a book to the cart; returns the updated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the book is out of stock or the token is invalid.
    #[instrument(skip(self, token), fields(book_id = %book_id, qty))]
    pub async fn add_to_cart(
        &self,
        token: &str,
        book_id: &BookId,
        qty: u32,
    ) -> Result<Cart, ApiError> {
        self.execute(
            self.post("/api/v1/cart")
                .bearer_auth(token)
                .json(&serde_json::json!({ "bookId": book_id, "qty": qty })),
        )
        .await
    }

    /// Set the quantity of a line item; returns the updated cart.
    ///
    /// Callers must not pass `qty` below 1; dropping a line goes through
    /// [`Self::remove_from_cart`].
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the token is invalid.
    #[instrument(skip(self, token), fields(book_id = %book_id, qty))]
    pub async fn update_cart_item(
        &self,
        token: &str,
        book_id: &BookId,
        qty: u32,
    ) -> Result<Cart, ApiError> {
        self.execute(
            self.put("/api/v1/cart/item")
                .bearer_auth(token)
                .json(&serde_json::json!({ "bookId": book_id, "qty": qty })),
        )
        .await
    }

    /// Remove a line item; returns the updated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid.
    #[instrument(skip(self, token), fields(book_id = %book_id))]
    pub async fn remove_from_cart(&self, token: &str, book_id: &BookId) -> Result<Cart, ApiError> {
        self.execute(
            self.delete(&format!("/api/v1/cart/item/{book_id}"))
                .bearer_auth(token),
        )
        .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid.
    #[instrument(skip(self, token))]
    pub async fn clear_cart(&self, token: &str) -> Result<(), ApiError> {
        self.execute_empty(self.delete("/api/v1/cart").bearer_auth(token))
            .await
    }
}
