//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use chrono::Utc;
use tracing::instrument;

use maktaba_api::{ListBooksQuery, ListOrdersQuery, ListUsersQuery};
use maktaba_core::Role;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::CurrentAdmin;
use crate::services::stats::{self, GenreSlice};
use crate::state::AppState;

/// One bar of the weekly sales chart.
pub struct DayBar {
    pub label: String,
    pub units: u32,
    /// Bar height as a percentage of the busiest day.
    pub percent: u32,
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin: Option<CurrentAdmin>,
    pub revenue: f64,
    pub order_count: usize,
    pub book_count: usize,
    pub customer_count: usize,
    pub days: Vec<DayBar>,
    pub growth: i64,
    pub genres: Vec<GenreSlice>,
}

/// Display the dashboard.
///
/// Aggregates are computed here from the full order, book, customer, and
/// category lists; the backend exposes no reporting endpoints.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
) -> Result<DashboardTemplate> {
    let orders = state
        .api()
        .list_orders(&auth.token, &ListOrdersQuery::default())
        .await?
        .orders;
    let books = state.api().list_books(&ListBooksQuery::all()).await?;
    let customers = state
        .api()
        .list_users(
            &auth.token,
            &ListUsersQuery {
                role: Some(Role::User),
                limit: Some(0),
                skip: None,
            },
        )
        .await?
        .users;
    let categories = state.api().list_categories().await?;

    let now = Utc::now();
    let buckets = stats::weekly_sales(&orders, now);
    let growth = stats::growth_rate(&buckets);
    let genres = stats::genre_distribution(&categories, &books);
    let revenue = stats::total_revenue(&orders);

    let busiest = buckets.iter().copied().max().unwrap_or(0).max(1);
    let days = (0i64..7)
        .zip(buckets.iter())
        .map(|(i, &units)| {
            let date = now - chrono::Duration::days(6 - i);
            DayBar {
                label: date.format("%a").to_string(),
                units,
                percent: units * 100 / busiest,
            }
        })
        .collect();

    Ok(DashboardTemplate {
        admin: Some(auth.admin),
        revenue,
        order_count: orders.len(),
        book_count: books.len(),
        customer_count: customers.len(),
        days,
        growth,
        genres,
    })
}
