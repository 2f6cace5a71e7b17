//! Book catalog operations.

use std::sync::Arc;

use tracing::{debug, instrument};

use maktaba_core::BookId;

use crate::error::ApiError;
use crate::types::{Book, BookInput, BooksPage};

use super::{ApiClient, ListBooksQuery};

impl ApiClient {
    /// List books matching the query. Public; cached unless searching.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn list_books(&self, query: &ListBooksQuery) -> Result<Arc<Vec<Book>>, ApiError> {
        let cache_key = query.cache_key();

        if let Some(key) = &cache_key
            && let Some(books) = self.cached_books(key).await
        {
            debug!("cache hit for book listing");
            return Ok(books);
        }

        let page: BooksPage = self
            .execute(self.get("/api/v1/books").query(&query.to_params()))
            .await?;
        let books = Arc::new(page.books);

        if let Some(key) = cache_key {
            self.cache_books(key, Arc::clone(&books)).await;
        }

        Ok(books)
    }

    /// Fetch a single book by id. Public.
    ///
    /// # Errors
    ///
    /// Returns an error if the book does not exist or the request fails.
    #[instrument(skip(self), fields(book_id = %book_id))]
    pub async fn get_book(&self, book_id: &BookId) -> Result<Book, ApiError> {
        self.execute(self.get(&format!("/api/v1/books/{book_id}")))
            .await
    }

    /// Create a book. Admin token required.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails server-side or the token is
    /// rejected.
    #[instrument(skip(self, token, input), fields(title = %input.title))]
    pub async fn create_book(&self, token: &str, input: &BookInput) -> Result<Book, ApiError> {
        let book = self
            .execute(self.post("/api/v1/books").bearer_auth(token).json(input))
            .await?;
        self.invalidate_catalog();
        Ok(book)
    }

    /// Update a book. Admin token required.
    ///
    /// # Errors
    ///
    /// Returns an error if the book does not exist or the token is rejected.
    #[instrument(skip(self, token, input), fields(book_id = %book_id))]
    pub async fn update_book(
        &self,
        token: &str,
        book_id: &BookId,
        input: &BookInput,
    ) -> Result<Book, ApiError> {
        let book = self
            .execute(
                self.put(&format!("/api/v1/books/{book_id}"))
                    .bearer_auth(token)
                    .json(input),
            )
            .await?;
        self.invalidate_catalog();
        Ok(book)
    }

    /// Delete a book. Admin token required.
    ///
    /// # Errors
    ///
    /// Returns an error if the book does not exist or the token is rejected.
    #[instrument(skip(self, token), fields(book_id = %book_id))]
    pub async fn delete_book(&self, token: &str, book_id: &BookId) -> Result<(), ApiError> {
        self.execute_empty(
            self.delete(&format!("/api/v1/books/{book_id}"))
                .bearer_auth(token),
        )
        .await?;
        self.invalidate_catalog();
        Ok(())
    }
}
