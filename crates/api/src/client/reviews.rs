//! Book reviews.

use tracing::instrument;

use maktaba_core::BookId;

use crate::error::ApiError;
use crate::types::{Review, ReviewInput};

use super::ApiClient;

impl ApiClient {
    /// All reviews for a book, newest first. Public.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(book_id = %book_id))]
    pub async fn list_reviews(&self, book_id: &BookId) -> Result<Vec<Review>, ApiError> {
        self.execute(self.get(&format!("/api/v1/reviews/book/{book_id}")))
            .await
    }

    /// Leave a review on a book. One per shopper per book.
    ///
    /// # Errors
    ///
    /// A second review from the same shopper surfaces as
    /// [`ApiError::Conflict`].
    #[instrument(skip(self, token, input), fields(book_id = %book_id, rating = input.rating))]
    pub async fn create_review(
        &self,
        token: &str,
        book_id: &BookId,
        input: &ReviewInput,
    ) -> Result<Review, ApiError> {
        self.execute(
            self.post(&format!("/api/v1/reviews/book/{book_id}"))
                .bearer_auth(token)
                .json(input),
        )
        .await
    }
}
