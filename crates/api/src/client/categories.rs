//! Category operations. Reads are public and cached; writes are admin-only.

use std::sync::Arc;

use tracing::{debug, instrument};

use maktaba_core::CategoryId;

use crate::error::ApiError;
use crate::types::{Category, CategoryInput};

use super::ApiClient;

const CATEGORIES_KEY: &str = "categories";

impl ApiClient {
    /// List all categories. Public; cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Arc<Vec<Category>>, ApiError> {
        if let Some(categories) = self.cached_categories(CATEGORIES_KEY).await {
            debug!("cache hit for category listing");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.execute(self.get("/api/v1/categories")).await?;
        let categories = Arc::new(categories);
        self.cache_categories(CATEGORIES_KEY.to_owned(), Arc::clone(&categories))
            .await;
        Ok(categories)
    }

    /// Create a category. Admin token required.
    ///
    /// # Errors
    ///
    /// A name collision surfaces as [`ApiError::Conflict`].
    #[instrument(skip(self, token, input), fields(name = %input.name))]
    pub async fn create_category(
        &self,
        token: &str,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        let category = self
            .execute(
                self.post("/api/v1/categories")
                    .bearer_auth(token)
                    .json(input),
            )
            .await?;
        self.invalidate_catalog();
        Ok(category)
    }

    /// Rename a category. Admin token required.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist or the new name
    /// collides.
    #[instrument(skip(self, token, input), fields(category_id = %category_id))]
    pub async fn update_category(
        &self,
        token: &str,
        category_id: &CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        let category = self
            .execute(
                self.put(&format!("/api/v1/categories/{category_id}"))
                    .bearer_auth(token)
                    .json(input),
            )
            .await?;
        self.invalidate_catalog();
        Ok(category)
    }

    /// Delete a category. Admin token required.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist or the token is
    /// rejected.
    #[instrument(skip(self, token), fields(category_id = %category_id))]
    pub async fn delete_category(
        &self,
        token: &str,
        category_id: &CategoryId,
    ) -> Result<(), ApiError> {
        self.execute_empty(
            self.delete(&format!("/api/v1/categories/{category_id}"))
                .bearer_auth(token),
        )
        .await?;
        self.invalidate_catalog();
        Ok(())
    }
}
