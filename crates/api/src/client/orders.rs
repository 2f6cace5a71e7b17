//! Order placement, payment, and fulfilment tracking.

use tracing::instrument;

use maktaba_core::{OrderId, OrderStatus};

use crate::error::ApiError;
use crate::types::{CreateOrderResponse, Order, OrdersPage, PaymentResponse, ShippingAddress};

use super::ApiClient;

/// Query parameters for the admin order listing.
#[derive(Debug, Clone, Default)]
pub struct ListOrdersQuery {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub search: Option<String>,
}

impl ListOrdersQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params
    }
}

impl ApiClient {
    /// Create an order from the shopper's current cart.
    ///
    /// The backend snapshots the cart into the order; payment happens in a
    /// separate call so a failed charge leaves a traceable unpaid order.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty or stock ran out.
    #[instrument(skip(self, token, address))]
    pub async fn create_order(
        &self,
        token: &str,
        address: &ShippingAddress,
    ) -> Result<CreateOrderResponse, ApiError> {
        self.execute(
            self.post("/api/v1/orders")
                .bearer_auth(token)
                .json(&serde_json::json!({ "shippingAddress": address })),
        )
        .await
    }

    /// Charge an order through the payment gateway.
    ///
    /// A declined charge is a successful HTTP exchange with
    /// `success: false` in the body, not an `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the gateway is
    /// unreachable.
    #[instrument(skip(self, token), fields(order_id = %order_id))]
    pub async fn pay_order(
        &self,
        token: &str,
        order_id: &OrderId,
    ) -> Result<PaymentResponse, ApiError> {
        self.execute(
            self.post(&format!("/api/v1/orders/{order_id}/pay"))
                .bearer_auth(token),
        )
        .await
    }

    /// The calling shopper's own orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the token is invalid.
    #[instrument(skip(self, token))]
    pub async fn my_orders(&self, token: &str) -> Result<OrdersPage, ApiError> {
        self.execute(self.get("/api/v1/orders/my").bearer_auth(token))
            .await
    }

    /// All orders, for the admin console. Admin token required.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn list_orders(
        &self,
        token: &str,
        query: &ListOrdersQuery,
    ) -> Result<OrdersPage, ApiError> {
        self.execute(
            self.get("/api/v1/orders")
                .bearer_auth(token)
                .query(&query.to_params()),
        )
        .await
    }

    /// Move an order to a new fulfilment status. Admin token required.
    ///
    /// The backend rejects illegal transitions, e.g. delivering an unpaid
    /// order.
    ///
    /// # Errors
    ///
    /// An illegal transition surfaces as [`ApiError::Api`] with the
    /// backend's message.
    #[instrument(skip(self, token), fields(order_id = %order_id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &str,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        self.execute(
            self.put(&format!("/api/v1/orders/{order_id}/status"))
                .bearer_auth(token)
                .json(&serde_json::json!({ "status": status })),
        )
        .await
    }
}
