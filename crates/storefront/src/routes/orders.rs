//! Order history for the signed-in shopper.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use maktaba_api::types::Order;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub user: Option<CurrentUser>,
    pub orders: Vec<Order>,
}

/// Display the shopper's orders, newest first.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
) -> Result<OrdersTemplate> {
    let page = state.api().my_orders(&auth.token).await?;

    Ok(OrdersTemplate {
        user: Some(auth.user),
        orders: page.orders,
    })
}
