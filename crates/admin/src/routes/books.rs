//! Catalog management route handlers.
//!
//! The book form carries a category multi-select, which urlencoded form
//! deserialization cannot express, so the body is parsed by hand from
//! the raw key/value pairs.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, RawForm, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use maktaba_api::types::{Book, BookInput, Category};
use maktaba_api::{ApiError, ListBooksQuery};
use maktaba_core::{BookId, CategoryId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::CurrentAdmin;
use crate::routes::ITEMS_PER_PAGE;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct BooksListQuery {
    pub page: Option<u32>,
    pub q: Option<String>,
}

/// Book listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "books/index.html")]
pub struct BooksIndexTemplate {
    pub admin: Option<CurrentAdmin>,
    pub books: Arc<Vec<Book>>,
    pub search: String,
    pub current_page: u32,
    pub has_more: bool,
}

/// Book create/edit form template.
///
/// `book_id` is `None` for the blank create form.
#[derive(Template, WebTemplate)]
#[template(path = "books/form.html")]
pub struct BookFormTemplate {
    pub admin: Option<CurrentAdmin>,
    pub book_id: Option<String>,
    pub form: BookForm,
    pub categories: Arc<Vec<Category>>,
    pub error: Option<String>,
}

/// Book form data. Numeric fields stay strings so a rejected submission
/// re-renders exactly what was typed.
#[derive(Debug, Clone, Default)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub price: String,
    pub stock: String,
    pub language: String,
    pub description: String,
    pub cover_url: String,
    pub categories: Vec<String>,
}

impl BookForm {
    /// Parse a urlencoded body, collecting repeated `categories` keys.
    fn from_urlencoded(body: &[u8]) -> Self {
        let mut form = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            let value = value.into_owned();
            match key.as_ref() {
                "title" => form.title = value,
                "author" => form.author = value,
                "price" => form.price = value,
                "stock" => form.stock = value,
                "language" => form.language = value,
                "description" => form.description = value,
                "cover_url" => form.cover_url = value,
                "categories" if !value.is_empty() => form.categories.push(value),
                _ => {}
            }
        }
        form
    }

    /// Whether the given category id is selected.
    #[must_use]
    pub fn has_category(&self, id: &str) -> bool {
        self.categories.iter().any(|c| c == id)
    }

    /// Validate and convert to the backend payload.
    fn to_input(&self) -> std::result::Result<BookInput, String> {
        let title = self.title.trim();
        let author = self.author.trim();
        if title.is_empty() || author.is_empty() {
            return Err("Title and author are required".to_string());
        }

        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| "Price must be a number".to_string())?;
        if price < 0.0 {
            return Err("Price cannot be negative".to_string());
        }

        let stock: i64 = self
            .stock
            .trim()
            .parse()
            .map_err(|_| "Stock must be a whole number".to_string())?;
        if stock < 0 {
            return Err("Stock cannot be negative".to_string());
        }

        Ok(BookInput {
            title: title.to_string(),
            author: author.to_string(),
            price,
            stock,
            language: optional(&self.language),
            description: optional(&self.description),
            cover_url: optional(&self.cover_url),
            categories: self
                .categories
                .iter()
                .map(|id| CategoryId::new(id.trim()))
                .collect(),
        })
    }
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            price: book.price.to_string(),
            stock: book.stock.to_string(),
            language: book.language.clone().unwrap_or_default(),
            description: book.description.clone().unwrap_or_default(),
            cover_url: book.cover_url.clone().unwrap_or_default(),
            categories: book
                .categories
                .iter()
                .map(|c| c.id.as_str().to_string())
                .collect(),
        }
    }
}

/// Display the paged book listing.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Query(query): Query<BooksListQuery>,
) -> Result<BooksIndexTemplate> {
    let current_page = query.page.unwrap_or(1).max(1);
    let search = query.q.unwrap_or_default();

    let list_query = ListBooksQuery {
        limit: Some(ITEMS_PER_PAGE),
        skip: Some((current_page - 1) * ITEMS_PER_PAGE),
        search: optional(&search),
        category: None,
        language: None,
    };
    let books = state.api().list_books(&list_query).await?;
    let has_more = books.len() == ITEMS_PER_PAGE as usize;

    Ok(BooksIndexTemplate {
        admin: Some(auth.admin),
        books,
        search,
        current_page,
        has_more,
    })
}

/// Display the blank book form.
#[instrument(skip(state, auth))]
pub async fn new_form(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
) -> Result<BookFormTemplate> {
    let categories = state.api().list_categories().await?;

    Ok(BookFormTemplate {
        admin: Some(auth.admin),
        book_id: None,
        form: BookForm::default(),
        categories,
        error: None,
    })
}

/// Display the pre-filled book form.
#[instrument(skip(state, auth))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<BookId>,
) -> Result<BookFormTemplate> {
    let book = match state.api().get_book(&id).await {
        Ok(book) => book,
        Err(ApiError::Api { status: 404, .. }) => {
            return Err(AppError::NotFound(format!("book {id}")));
        }
        Err(e) => return Err(e.into()),
    };
    let categories = state.api().list_categories().await?;

    Ok(BookFormTemplate {
        admin: Some(auth.admin),
        book_id: Some(id.into_inner()),
        form: BookForm::from(&book),
        categories,
        error: None,
    })
}

/// Create a book.
#[instrument(skip(state, auth, body))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    RawForm(body): RawForm,
) -> Result<Response> {
    let form = BookForm::from_urlencoded(&body);
    let input = match form.to_input() {
        Ok(input) => input,
        Err(error) => {
            return form_error(&state, auth.admin, None, form, error).await;
        }
    };

    match state.api().create_book(&auth.token, &input).await {
        Ok(_) => Ok(Redirect::to("/books").into_response()),
        Err(ApiError::Api { message, .. } | ApiError::Conflict(message)) => {
            form_error(&state, auth.admin, None, form, message).await
        }
        Err(e) => Err(e.into()),
    }
}

/// Update a book.
#[instrument(skip(state, auth, body), fields(book_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<BookId>,
    RawForm(body): RawForm,
) -> Result<Response> {
    let form = BookForm::from_urlencoded(&body);
    let input = match form.to_input() {
        Ok(input) => input,
        Err(error) => {
            return form_error(&state, auth.admin, Some(id.into_inner()), form, error).await;
        }
    };

    match state.api().update_book(&auth.token, &id, &input).await {
        Ok(_) => Ok(Redirect::to("/books").into_response()),
        Err(ApiError::Api { message, .. } | ApiError::Conflict(message)) => {
            form_error(&state, auth.admin, Some(id.into_inner()), form, message).await
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a book. The row disappears only on a success response.
#[instrument(skip(state, auth), fields(book_id = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<BookId>,
) -> Result<StatusCode> {
    state.api().delete_book(&auth.token, &id).await?;
    Ok(StatusCode::OK)
}

async fn form_error(
    state: &AppState,
    admin: CurrentAdmin,
    book_id: Option<String>,
    form: BookForm,
    error: String,
) -> Result<Response> {
    let categories = state.api().list_categories().await?;

    Ok(BookFormTemplate {
        admin: Some(admin),
        book_id,
        form,
        categories,
        error: Some(error),
    }
    .into_response())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencoded_collects_repeated_categories() {
        let body = b"title=Dune&author=Herbert&price=9.50&stock=3&categories=c1&categories=c2";
        let form = BookForm::from_urlencoded(body);
        assert_eq!(form.categories, vec!["c1", "c2"]);
        assert!(form.has_category("c2"));
        assert!(!form.has_category("c3"));
    }

    #[test]
    fn test_form_requires_title_and_author() {
        let form = BookForm {
            author: "Cawl".into(),
            price: "10".into(),
            stock: "1".into(),
            ..BookForm::default()
        };
        assert!(form.to_input().is_err());
    }

    #[test]
    fn test_form_rejects_bad_numbers() {
        let mut form = BookForm {
            title: "T".into(),
            author: "A".into(),
            price: "abc".into(),
            stock: "1".into(),
            ..BookForm::default()
        };
        assert!(form.to_input().is_err());

        form.price = "-1".into();
        assert!(form.to_input().is_err());

        form.price = "180.0".into();
        form.stock = "2.5".into();
        assert!(form.to_input().is_err());
    }

    #[test]
    fn test_form_maps_categories_and_blanks() {
        let form = BookForm {
            title: " Aqoondarro ".into(),
            author: "Cawl".into(),
            price: "180.0".into(),
            stock: "12".into(),
            language: String::new(),
            description: "  ".into(),
            cover_url: "https://cdn.example.com/c.jpg".into(),
            categories: vec!["c1".into()],
        };
        let input = form.to_input().unwrap();
        assert_eq!(input.title, "Aqoondarro");
        assert_eq!(input.categories, vec![CategoryId::new("c1")]);
        assert!(input.language.is_none());
        assert!(input.description.is_none());
    }
}
