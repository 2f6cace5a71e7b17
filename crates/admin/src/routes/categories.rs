//! Category management route handlers.
//!
//! The category list is small, so the whole list is fetched and paged
//! in the handler rather than asking the backend for slices.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use maktaba_api::ApiError;
use maktaba_api::types::{Category, CategoryInput};
use maktaba_core::CategoryId;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::CurrentAdmin;
use crate::routes::ITEMS_PER_PAGE;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct CategoriesListQuery {
    pub page: Option<u32>,
    pub q: Option<String>,
}

/// Category listing page template with inline create form.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub admin: Option<CurrentAdmin>,
    pub categories: Vec<Category>,
    pub search: String,
    pub current_page: u32,
    pub has_more: bool,
    pub new_name: String,
    pub error: Option<String>,
}

/// Category form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

/// Slice one page out of a filtered category list.
fn page_of(categories: &[Category], search: &str, page: u32) -> (Vec<Category>, bool) {
    let needle = search.trim().to_lowercase();
    let filtered: Vec<Category> = categories
        .iter()
        .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    let start = ((page - 1) * ITEMS_PER_PAGE) as usize;
    let end = (start + ITEMS_PER_PAGE as usize).min(filtered.len());
    let has_more = filtered.len() > end;
    let slice = if start >= filtered.len() {
        Vec::new()
    } else {
        filtered[start..end].to_vec()
    };

    (slice, has_more)
}

/// Display the paged category listing.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Query(query): Query<CategoriesListQuery>,
) -> Result<CategoriesIndexTemplate> {
    let current_page = query.page.unwrap_or(1).max(1);
    let search = query.q.unwrap_or_default();

    let all = state.api().list_categories().await?;
    let (categories, has_more) = page_of(&all, &search, current_page);

    Ok(CategoriesIndexTemplate {
        admin: Some(auth.admin),
        categories,
        search,
        current_page,
        has_more,
        new_name: String::new(),
        error: None,
    })
}

/// Create a category. A duplicate name re-renders the list with an
/// inline message and the list unchanged.
#[instrument(skip(state, auth, form), fields(name = %form.name))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let name = form.name.trim().to_string();
    let error = if name.is_empty() {
        Some("Category name is required".to_string())
    } else {
        let input = CategoryInput { name: name.clone() };
        match state.api().create_category(&auth.token, &input).await {
            Ok(_) => None,
            Err(ApiError::Conflict(message) | ApiError::Api { message, .. }) => Some(message),
            Err(e) => return Err(e.into()),
        }
    };

    let Some(error) = error else {
        return Ok(Redirect::to("/categories").into_response());
    };

    let all = state.api().list_categories().await?;
    let (categories, has_more) = page_of(&all, "", 1);

    Ok(CategoriesIndexTemplate {
        admin: Some(auth.admin),
        categories,
        search: String::new(),
        current_page: 1,
        has_more,
        new_name: name,
        error: Some(error),
    }
    .into_response())
}

/// Rename a category.
#[instrument(skip(state, auth, form), fields(category_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    let input = CategoryInput {
        name: form.name.trim().to_string(),
    };
    state.api().update_category(&auth.token, &id, &input).await?;
    Ok(Redirect::to("/categories"))
}

/// Delete a category. The row disappears only on a success response.
#[instrument(skip(state, auth), fields(category_id = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    state.api().delete_category(&auth.token, &id).await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<Category> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Category {
                id: CategoryId::new(format!("c{i}")),
                name: (*name).to_string(),
                slug: None,
            })
            .collect()
    }

    #[test]
    fn test_paging_slices_five_at_a_time() {
        let all = named(&["A", "B", "C", "D", "E", "F", "G"]);

        let (first, more) = page_of(&all, "", 1);
        assert_eq!(first.len(), 5);
        assert!(more);

        let (second, more) = page_of(&all, "", 2);
        assert_eq!(second.len(), 2);
        assert!(!more);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let all = named(&["Fiction", "Science Fiction", "History"]);
        let (hits, _) = page_of(&all, "fict", 1);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let all = named(&["A"]);
        let (hits, more) = page_of(&all, "", 9);
        assert!(hits.is_empty());
        assert!(!more);
    }
}
