//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /books                  - Book listing (search + category/language filters)
//! GET  /books/{id}             - Book detail with reviews
//! POST /books/{id}/reviews     - Leave a review (requires auth)
//!
//! # Cart (HTMX fragments, requires auth)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count fragment, triggers cart-updated)
//! POST /cart/buy-now           - Add to cart then go straight to checkout
//! POST /cart/update            - Set quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! POST /cart/coupon            - Apply a coupon code (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout (requires auth, wrapped in a panic boundary)
//! GET  /checkout               - Shipping form
//! POST /checkout               - Place order + charge payment
//! GET  /payment/success        - Payment confirmation
//! GET  /payment/return         - Post-gateway landing page
//!
//! # Orders
//! GET  /orders                 - The shopper's order history (requires auth)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Registration page
//! POST /auth/register          - Send one-time passcode
//! GET  /auth/verify-otp        - Passcode entry page
//! POST /auth/verify-otp        - Complete registration
//! POST /auth/logout            - Logout action
//! ```

pub mod auth;
pub mod books;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;

use std::any::Any;

use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::state::AppState;

/// Create the book catalog routes router.
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(books::index))
        .route("/{id}", get(books::show))
        .route("/{id}/reviews", post(books::create_review))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/buy-now", post(cart::buy_now))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/coupon", post(cart::apply_coupon))
        .route("/count", get(cart::count))
}

/// Create the checkout and payment routes router.
///
/// The whole subtree sits behind a panic boundary: a crash mid-payment
/// renders a static recovery page instead of a dropped connection.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(checkout::form).post(checkout::submit))
        .route("/payment/success", get(checkout::payment_success))
        .route("/payment/return", get(checkout::payment_return))
        .layer(CatchPanicLayer::custom(checkout_panic_response))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route(
            "/verify-otp",
            get(auth::verify_otp_page).post(auth::verify_otp),
        )
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/books", book_routes())
        .nest("/cart", cart_routes())
        .merge(checkout_routes())
        .route("/orders", get(orders::index))
        .nest("/auth", auth_routes())
}

/// Static recovery page for panics inside the checkout subtree.
fn checkout_panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Checkout handler panicked");
    sentry::capture_message(
        &format!("Checkout handler panicked: {detail}"),
        sentry::Level::Fatal,
    );

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(
            "<!doctype html><html><head><title>Something went wrong</title></head>\
             <body><h1>Something went wrong</h1>\
             <p>Your payment may not have completed. Please check your orders \
             before retrying.</p>\
             <p><a href=\"/checkout\">Reload checkout</a> or \
             <a href=\"/\">return home</a>.</p></body></html>",
        ),
    )
        .into_response()
}
