//! Wire types for the bookstore backend.
//!
//! The backend speaks camelCase JSON with Mongo-style `_id` identifiers.
//! Numeric money fields arrive as plain JSON numbers. Fields the frontends
//! never read are not modeled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use maktaba_core::{BookId, CategoryId, CouponId, OrderId, OrderStatus, ReviewId, Role, UserId};

// =============================================================================
// Catalog
// =============================================================================

/// A book as returned by `/api/v1/books`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    /// Populated category references.
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
}

impl Book {
    /// Whether the book can currently be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A category reference embedded in a book payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    #[serde(default)]
    pub name: String,
}

/// A category as returned by `/api/v1/categories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Page envelope for book listings: `{"books": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BooksPage {
    #[serde(default)]
    pub books: Vec<Book>,
}

/// Fields submitted when creating or updating a book.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub price: f64,
    pub stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub categories: Vec<CategoryId>,
}

/// Fields submitted when creating or updating a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInput {
    pub name: String,
}

// =============================================================================
// Coupons
// =============================================================================

/// Coupon discount kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponType {
    Percent,
    Fixed,
}

impl CouponType {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Percent => "Percentage",
            Self::Fixed => "Fixed Amount",
        }
    }
}

/// A coupon record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(rename = "_id")]
    pub id: CouponId,
    pub code: String,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    pub value: f64,
}

/// Fields submitted when creating or updating a coupon.
#[derive(Debug, Clone, Serialize)]
pub struct CouponInput {
    pub code: String,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    pub value: f64,
}

// =============================================================================
// Users & auth
// =============================================================================

/// A user account record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Page envelope for user listings: `{"users": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersPage {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Response to a successful credential exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    #[serde(default)]
    pub message: Option<String>,
}

/// Generic `{"message": "..."}` acknowledgment.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Cart
// =============================================================================

/// The book fields embedded in a populated cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartBook {
    #[serde(rename = "_id")]
    pub id: BookId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub cover_url: Option<String>,
}

/// One line item of the server-held cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub book: CartBook,
    #[serde(default = "default_qty")]
    pub qty: u32,
}

const fn default_qty() -> u32 {
    1
}

/// The server-held cart. The client holds only a transient cached copy;
/// every mutation replaces it with the backend's authoritative response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub total: f64,
}

impl Cart {
    /// Total number of units across all line items.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.qty).sum()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Orders & payment
// =============================================================================

/// Shipping address submitted at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub label: String,
    pub name: String,
    pub phone: String,
    pub street: String,
    pub district: String,
    pub city: String,
    pub country: String,
}

/// A price-snapshotted line item within an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<f64>,
}

/// The customer summary embedded in an admin order listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// An order record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub user: Option<OrderUser>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
}

impl Order {
    /// Total number of units across the order's line items.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Page envelope for order listings: `{"orders": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersPage {
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Response to order creation: `{"orderId": "..."}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: OrderId,
}

/// Response to payment initiation.
///
/// `waafi_response` is an opaque provider payload; the success page picks
/// a few well-known fields out of it when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub waafi_response: Option<serde_json::Value>,
}

// =============================================================================
// Reviews
// =============================================================================

/// A book review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    #[serde(default)]
    pub user: Option<OrderUser>,
    #[serde(default)]
    pub rating: u32,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields submitted when posting a review.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewInput {
    pub rating: u32,
    pub comment: String,
}

/// Average rating and count over a set of reviews.
///
/// The backend does not aggregate ratings; the catalog computes this from
/// the raw review list, matching what shoppers see on a book card.
#[must_use]
pub fn rating_summary(reviews: &[Review]) -> (f64, usize) {
    if reviews.is_empty() {
        return (0.0, 0);
    }
    let total: u32 = reviews.iter().map(|r| r.rating).sum();
    let avg = f64::from(total) / reviews.len() as f64;
    // One decimal place, like the storefront displays it.
    ((avg * 10.0).round() / 10.0, reviews.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_book_deserializes_backend_payload() {
        let json = r#"{
            "_id": "68a1f3b2",
            "title": "Aqoondarro waa u nacab jacayl",
            "author": "Faarax M. J. Cawl",
            "price": 180.0,
            "stock": 12,
            "language": "Somali",
            "coverUrl": "https://cdn.example.com/covers/68a1f3b2.jpg",
            "categories": [{"_id": "c1", "name": "Fiction"}]
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.id.as_str(), "68a1f3b2");
        assert_eq!(book.categories.len(), 1);
        assert!(book.in_stock());
        assert_eq!(book.cover_url.as_deref().unwrap().split('/').next_back(), Some("68a1f3b2.jpg"));
    }

    #[test]
    fn test_book_tolerates_missing_optional_fields() {
        let json = r#"{"_id": "b1", "title": "T", "author": "A"}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert!(book.categories.is_empty());
        assert!(!book.in_stock());
        assert!((book.price - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cart_defaults_when_fields_absent() {
        let cart: Cart = serde_json::from_str("{}").unwrap();
        assert!(cart.is_empty());
        assert!((cart.total - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cart_unit_count_sums_quantities() {
        let json = r#"{
            "items": [
                {"book": {"_id": "b1", "title": "One", "price": 10.0}, "qty": 2},
                {"book": {"_id": "b2", "title": "Two", "price": 5.0}, "qty": 1}
            ],
            "subtotal": 25.0,
            "discount": 0,
            "total": 25.0
        }"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.unit_count(), 3);
    }

    #[test]
    fn test_coupon_type_field_rename() {
        let json = r#"{"_id": "cp1", "code": "SAVE10", "type": "percent", "value": 10.0}"#;
        let coupon: Coupon = serde_json::from_str(json).unwrap();
        assert_eq!(coupon.coupon_type, CouponType::Percent);

        let out = serde_json::to_value(CouponInput {
            code: "SAVE10".into(),
            coupon_type: CouponType::Fixed,
            value: 25.0,
        })
        .unwrap();
        assert_eq!(out["type"], "fixed");
    }

    #[test]
    fn test_order_deserializes_with_status_and_date() {
        let json = r#"{
            "_id": "o1",
            "user": {"name": "Ayaan", "email": "ayaan@example.com"},
            "items": [{"title": "One", "quantity": 2, "price": 10.0}],
            "total": 20.0,
            "status": "paid",
            "createdAt": "2026-08-25T09:30:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.unit_count(), 2);
    }

    #[test]
    fn test_payment_response_failure_shape() {
        let json = r#"{"success": false, "error": "Insufficient balance"}"#;
        let resp: PaymentResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Insufficient balance"));
        assert!(resp.waafi_response.is_none());
    }

    #[test]
    fn test_payment_response_success_keeps_provider_payload_opaque() {
        let json = r#"{
            "success": true,
            "message": "Payment completed",
            "waafiResponse": {"params": {"transactionId": "TX9", "state": "APPROVED"}}
        }"#;
        let resp: PaymentResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        let payload = resp.waafi_response.unwrap();
        assert_eq!(payload["params"]["transactionId"], "TX9");
    }

    #[test]
    fn test_rating_summary_empty_is_zero() {
        assert_eq!(rating_summary(&[]), (0.0, 0));
    }

    #[test]
    fn test_rating_summary_one_decimal() {
        let reviews: Vec<Review> = serde_json::from_str(
            r#"[
                {"_id": "r1", "rating": 5},
                {"_id": "r2", "rating": 4},
                {"_id": "r3", "rating": 4}
            ]"#,
        )
        .unwrap();
        let (avg, count) = rating_summary(&reviews);
        assert_eq!(count, 3);
        assert!((avg - 4.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_book_input_serializes_camel_case() {
        let input = BookInput {
            title: "T".into(),
            author: "A".into(),
            price: 9.5,
            stock: 3,
            language: Some("Somali".into()),
            description: None,
            cover_url: Some("https://cdn.example.com/c.jpg".into()),
            categories: vec![maktaba_core::CategoryId::new("c1")],
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["coverUrl"], "https://cdn.example.com/c.jpg");
        assert!(value.get("description").is_none());
    }
}
