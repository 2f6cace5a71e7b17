//! Home page.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use maktaba_api::types::{Book, Category};
use maktaba_api::ListBooksQuery;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Number of featured books shown on the home page.
const FEATURED_COUNT: u32 = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<CurrentUser>,
    pub featured: Arc<Vec<Book>>,
    pub categories: Arc<Vec<Category>>,
}

/// Display the home page: featured books plus a shop-by-category strip.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<HomeTemplate> {
    let featured = state
        .api()
        .list_books(&ListBooksQuery::page(FEATURED_COUNT, 0))
        .await?;
    let categories = state.api().list_categories().await?;

    Ok(HomeTemplate {
        user: user.map(|a| a.user),
        featured,
        categories,
    })
}
