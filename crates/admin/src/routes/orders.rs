//! Order fulfilment route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use maktaba_api::types::Order;
use maktaba_api::{ApiError, ListOrdersQuery};
use maktaba_core::{OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::CurrentAdmin;
use crate::routes::ITEMS_PER_PAGE;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct OrdersListQuery {
    pub page: Option<u32>,
    pub q: Option<String>,
}

/// Order listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub admin: Option<CurrentAdmin>,
    pub orders: Vec<Order>,
    pub statuses: [OrderStatus; 6],
    pub search: String,
    pub current_page: u32,
    pub has_more: bool,
    pub row_error: Option<String>,
}

/// A single order row fragment, swapped in place after a status change.
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_row.html")]
pub struct OrderRowTemplate {
    pub order: Order,
    pub statuses: [OrderStatus; 6],
    pub row_error: Option<String>,
}

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
}

/// Display the paged order listing.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Query(query): Query<OrdersListQuery>,
) -> Result<OrdersIndexTemplate> {
    let current_page = query.page.unwrap_or(1).max(1);
    let search = query.q.unwrap_or_default();

    let list_query = ListOrdersQuery {
        limit: Some(ITEMS_PER_PAGE),
        skip: Some((current_page - 1) * ITEMS_PER_PAGE),
        search: {
            let trimmed = search.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        },
    };
    let orders = state.api().list_orders(&auth.token, &list_query).await?.orders;
    let has_more = orders.len() == ITEMS_PER_PAGE as usize;

    Ok(OrdersIndexTemplate {
        admin: Some(auth.admin),
        orders,
        statuses: OrderStatus::ALL,
        search,
        current_page,
        has_more,
        row_error: None,
    })
}

/// Move an order along fulfilment, swapping the updated row back in.
///
/// The backend owns the legal-transition rules; a rejected move comes
/// back as the unchanged row with the backend's message inline.
#[instrument(skip(state, auth, form), fields(order_id = %id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<OrderId>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    match state
        .api()
        .update_order_status(&auth.token, &id, form.status)
        .await
    {
        Ok(order) => Ok(OrderRowTemplate {
            order,
            statuses: OrderStatus::ALL,
            row_error: None,
        }
        .into_response()),
        Err(ApiError::Api { message, .. } | ApiError::Conflict(message)) => {
            let listing = state
                .api()
                .list_orders(&auth.token, &ListOrdersQuery::default())
                .await?;
            let order = listing
                .orders
                .into_iter()
                .find(|o| o.id == id)
                .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

            Ok(OrderRowTemplate {
                order,
                statuses: OrderStatus::ALL,
                row_error: Some(message),
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
