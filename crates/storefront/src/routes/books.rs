//! Book catalog route handlers.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use maktaba_api::types::{Book, Category, Review, ReviewInput, rating_summary};
use maktaba_api::{ApiError, ListBooksQuery};
use maktaba_core::BookId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{OptionalUser, RequireUser};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Books shown per catalog page.
const PAGE_SIZE: u32 = 12;

/// Languages the catalog can be filtered by.
pub const LANGUAGES: [&str; 4] = ["English", "Arabic", "French", "Somali"];

/// Catalog listing query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<u32>,
    pub q: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
}

/// Book listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "books/index.html")]
pub struct BooksIndexTemplate {
    pub user: Option<CurrentUser>,
    pub books: Arc<Vec<Book>>,
    pub categories: Arc<Vec<Category>>,
    pub languages: [&'static str; 4],
    pub search: String,
    pub selected_category: String,
    pub selected_language: String,
    pub current_page: u32,
    pub has_more: bool,
}

/// Book detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "books/show.html")]
pub struct BookShowTemplate {
    pub user: Option<CurrentUser>,
    pub book: Book,
    pub reviews: Vec<Review>,
    pub average_rating: f64,
    pub review_count: usize,
    pub review_error: Option<String>,
}

/// Display the book listing page.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<CatalogQuery>,
) -> Result<BooksIndexTemplate> {
    let current_page = query.page.unwrap_or(1).max(1);
    let search = query.q.unwrap_or_default();
    let selected_category = query.category.unwrap_or_default();
    let selected_language = query.language.unwrap_or_default();

    let list_query = ListBooksQuery {
        limit: Some(PAGE_SIZE),
        skip: Some((current_page - 1) * PAGE_SIZE),
        search: non_empty(&search),
        category: non_empty(&selected_category),
        language: non_empty(&selected_language),
    };

    let books = state.api().list_books(&list_query).await?;
    let categories = state.api().list_categories().await?;

    // The backend does not return a total count; offer a next page while
    // full pages keep coming back.
    let has_more = books.len() == PAGE_SIZE as usize;

    Ok(BooksIndexTemplate {
        user: user.map(|a| a.user),
        books,
        categories,
        languages: LANGUAGES,
        search,
        selected_category,
        selected_language,
        current_page,
        has_more,
    })
}

/// Display the book detail page with its reviews.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<BookId>,
) -> Result<BookShowTemplate> {
    let book = match state.api().get_book(&id).await {
        Ok(book) => book,
        Err(ApiError::Api { status: 404, .. }) => {
            return Err(AppError::NotFound(format!("book {id}")));
        }
        Err(e) => return Err(e.into()),
    };
    let reviews = state.api().list_reviews(&id).await?;
    let (average_rating, review_count) = rating_summary(&reviews);

    Ok(BookShowTemplate {
        user: user.map(|a| a.user),
        book,
        reviews,
        average_rating,
        review_count,
        review_error: None,
    })
}

/// Review submission form data.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub rating: u32,
    pub comment: String,
}

/// Leave a review on a book.
#[instrument(skip(state, auth, form))]
pub async fn create_review(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Path(id): Path<BookId>,
    Form(form): Form<ReviewForm>,
) -> Result<Response> {
    let comment = form.comment.trim();
    let error = if !(1..=5).contains(&form.rating) {
        Some("Rating must be between 1 and 5".to_string())
    } else if comment.is_empty() {
        Some("Please write a few words about the book".to_string())
    } else {
        let input = ReviewInput {
            rating: form.rating,
            comment: comment.to_string(),
        };
        match state.api().create_review(&auth.token, &id, &input).await {
            Ok(_) => None,
            Err(ApiError::Conflict(msg)) => Some(msg),
            Err(e) => return Err(e.into()),
        }
    };

    let Some(review_error) = error else {
        return Ok(Redirect::to(&format!("/books/{id}")).into_response());
    };

    // Re-render the detail page with the inline error
    let book = state.api().get_book(&id).await?;
    let reviews = state.api().list_reviews(&id).await?;
    let (average_rating, review_count) = rating_summary(&reviews);

    Ok(BookShowTemplate {
        user: Some(auth.user),
        book,
        reviews,
        average_rating,
        review_count,
        review_error: Some(review_error),
    }
    .into_response())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_trims_whitespace() {
        assert_eq!(non_empty("  cawl "), Some("cawl".to_string()));
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty(""), None);
    }
}
