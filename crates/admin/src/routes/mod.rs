//! HTTP route handlers for the admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                       - Dashboard (sales chart, revenue, genre mix)
//! GET    /health                 - Health check
//!
//! # Auth
//! GET    /auth/login             - Sign-in page
//! POST   /auth/login             - Sign-in action (admin accounts only)
//! POST   /auth/logout            - Sign-out action
//!
//! # Books
//! GET    /books                  - Paged catalog listing with search
//! GET    /books/new              - Blank book form
//! POST   /books                  - Create a book
//! GET    /books/{id}/edit        - Pre-filled book form
//! POST   /books/{id}             - Update a book
//! DELETE /books/{id}             - Delete a book (HTMX row removal)
//!
//! # Categories
//! GET    /categories             - Paged listing with inline create form
//! POST   /categories             - Create a category
//! POST   /categories/{id}        - Rename a category
//! DELETE /categories/{id}        - Delete a category
//!
//! # Coupons
//! GET    /coupons                - Paged listing with inline create form
//! POST   /coupons                - Create a coupon
//! GET    /coupons/{id}/edit      - Pre-filled coupon form
//! POST   /coupons/{id}           - Update a coupon
//! DELETE /coupons/{id}           - Delete a coupon
//!
//! # Users
//! GET    /users                  - Paged listing with role filter
//! POST   /users/{id}/role        - Promote or demote (HTMX row swap)
//! DELETE /users/{id}             - Delete an account
//!
//! # Orders
//! GET    /orders                 - Paged listing with search
//! POST   /orders/{id}/status     - Move an order along fulfilment (HTMX row swap)
//! ```

pub mod auth;
pub mod books;
pub mod categories;
pub mod coupons;
pub mod dashboard;
pub mod orders;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Rows shown per page on every admin listing.
pub const ITEMS_PER_PAGE: u32 = 5;

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .nest("/auth", auth_routes())
        .nest("/books", book_routes())
        .nest("/categories", category_routes())
        .nest("/coupons", coupon_routes())
        .nest("/users", user_routes())
        .nest("/orders", order_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(books::index).post(books::create))
        .route("/new", get(books::new_form))
        .route("/{id}/edit", get(books::edit_form))
        .route("/{id}", post(books::update).delete(books::destroy))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route(
            "/{id}",
            post(categories::update).delete(categories::destroy),
        )
}

fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(coupons::index).post(coupons::create))
        .route("/{id}/edit", get(coupons::edit_form))
        .route("/{id}", post(coupons::update).delete(coupons::destroy))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/{id}/role", post(users::update_role))
        .route("/{id}", delete(users::destroy))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}/status", post(orders::update_status))
}
