//! End-to-end test harness for the storefront and admin console.
//!
//! Both binaries are booted in-process on ephemeral ports against a stub
//! bookstore backend, also in-process. Sessions use an in-memory store so
//! no database is needed; the `PostgreSQL` pool is created lazily and the
//! tests never touch it.
//!
//! The stub backend keys its behavior off the bearer token it handed out
//! at login, so a test picks a scenario by picking a sign-in email:
//!
//! - `shopper@maktaba.example`  - regular account, everything succeeds
//! - `admin@maktaba.example`    - admin account
//! - `declined@maktaba.example` - payment attempts come back declined
//! - `stale@maktaba.example`    - every authenticated call after login
//!   is rejected with 401, as if the token had expired

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tower_sessions::{MemoryStore, SessionManagerLayer};

/// Shared log of every request the stub backend received, as
/// `"METHOD /path"` strings.
pub type Hits = Arc<Mutex<Vec<String>>>;

/// A running stub backend.
pub struct TestBackend {
    pub addr: SocketAddr,
    hits: Hits,
}

impl TestBackend {
    /// Backend origin URL for client configuration.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Snapshot of the requests received so far.
    #[must_use]
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().expect("hits lock poisoned").clone()
    }

    /// How many recorded requests start with the given prefix.
    #[must_use]
    pub fn hit_count(&self, prefix: &str) -> usize {
        self.hits()
            .iter()
            .filter(|hit| hit.starts_with(prefix))
            .count()
    }
}

/// Start the stub bookstore backend on an ephemeral port.
pub async fn spawn_backend() -> TestBackend {
    let hits: Hits = Arc::new(Mutex::new(Vec::new()));

    let router = Router::new()
        .route("/api/v1/auth/login", post(stub_login))
        .route("/api/v1/books", get(stub_books).post(stub_echo_book))
        .route("/api/v1/books/{id}", get(stub_book).delete(stub_delete))
        .route("/api/v1/categories", get(stub_categories))
        .route("/api/v1/categories/{id}", delete(stub_delete))
        .route("/api/v1/reviews/book/{id}", get(stub_reviews))
        .route("/api/v1/cart", get(stub_cart).post(stub_cart).delete(stub_empty))
        .route("/api/v1/cart/item", put(stub_cart_update))
        .route("/api/v1/cart/item/{id}", delete(stub_cart))
        .route("/api/v1/cart/coupon", post(stub_cart))
        .route("/api/v1/orders", post(stub_create_order).get(stub_orders))
        .route("/api/v1/orders/my", get(stub_orders))
        .route("/api/v1/orders/{id}/pay", post(stub_pay))
        .route("/api/v1/coupons", get(stub_coupons).post(stub_create_coupon))
        .route("/api/v1/coupons/{id}", delete(stub_delete))
        .route("/api/v1/users", get(stub_users))
        .route("/api/v1/users/{id}", delete(stub_delete))
        .layer(middleware::from_fn_with_state(hits.clone(), record_hit))
        .with_state(());

    let addr = spawn(router).await;
    TestBackend { addr, hits }
}

/// Start the storefront against the given backend origin.
pub async fn spawn_storefront(api_url: &str) -> SocketAddr {
    let config = maktaba_storefront::config::StorefrontConfig {
        database_url: SecretString::from("postgres://postgres@localhost/maktaba_test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        api_url: api_url.to_string(),
        admin_console_url: "http://127.0.0.1:3001".to_string(),
        session_secret: SecretString::from("kQ9#mX2$vL5@pW8!dR4&hT7*fN1^sB6%".to_string()),
        sentry_dsn: None,
        sentry_environment: None,
    };
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://postgres@localhost/maktaba_test")
        .expect("lazy pool");
    let state = maktaba_storefront::state::AppState::new(config, pool);
    let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);

    spawn(maktaba_storefront::app(state, session_layer)).await
}

/// Start the admin console against the given backend origin.
pub async fn spawn_admin(api_url: &str) -> SocketAddr {
    let config = maktaba_admin::config::AdminConfig {
        database_url: SecretString::from("postgres://postgres@localhost/maktaba_test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        api_url: api_url.to_string(),
        session_secret: SecretString::from("zF3!tK8#bQ1$wY6@nM9%jC4&xH7*gP2^".to_string()),
        sentry_dsn: None,
        sentry_environment: None,
    };
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://postgres@localhost/maktaba_test")
        .expect("lazy pool");
    let state = maktaba_admin::state::AppState::new(config, pool);
    let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);

    spawn(maktaba_admin::app(state, session_layer)).await
}

/// A browser-like HTTP client: keeps cookies, never follows redirects, so
/// tests can assert on `Location` headers.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("reqwest client")
}

/// Sign in on the storefront or admin console with the given email.
pub async fn sign_in(client: &reqwest::Client, origin: &str, email: &str) -> reqwest::Response {
    client
        .post(format!("{origin}/auth/login"))
        .form(&[("email", email), ("password", "correct-horse")])
        .send()
        .await
        .expect("login request")
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}

// ============================================================================
// Stub backend handlers
// ============================================================================

async fn record_hit(State(hits): State<Hits>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri().path());
    hits.lock().expect("hits lock poisoned").push(line);
    next.run(request).await
}

fn bearer(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// 401 for the stale-token scenario, `None` otherwise.
fn reject_stale(headers: &axum::http::HeaderMap) -> Option<Response> {
    if bearer(headers) == Some("stale-token") {
        Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "jwt expired"})),
            )
                .into_response(),
        )
    } else {
        None
    }
}

async fn stub_login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();

    if password == "wrong" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response();
    }

    let (token, role) = match email.as_str() {
        "admin@maktaba.example" => ("admin-token", "admin"),
        "stale@maktaba.example" => ("stale-token", "user"),
        "declined@maktaba.example" => ("declined-token", "user"),
        _ => ("shopper-token", "user"),
    };

    Json(json!({
        "token": token,
        "user": {
            "_id": "u1",
            "name": "Ayaan Test",
            "email": email,
            "role": role,
        }
    }))
    .into_response()
}

fn sample_book() -> Value {
    json!({
        "_id": "bk1",
        "title": "Aqoondarro waa u nacab jacayl",
        "author": "Faarax M. J. Cawl",
        "price": 180.0,
        "stock": 12,
        "language": "Somali",
        "categories": [{"_id": "c1", "name": "Fiction"}]
    })
}

async fn stub_books() -> Json<Value> {
    Json(json!({"books": [sample_book()]}))
}

async fn stub_book(Path(_id): Path<String>) -> Json<Value> {
    Json(sample_book())
}

async fn stub_echo_book(Json(body): Json<Value>) -> Json<Value> {
    let mut book = sample_book();
    book["title"] = body["title"].clone();
    Json(book)
}

async fn stub_categories() -> Json<Value> {
    Json(json!([{"_id": "c1", "name": "Fiction"}]))
}

async fn stub_reviews(Path(_id): Path<String>) -> Json<Value> {
    Json(json!([]))
}

fn sample_cart(qty: u64) -> Value {
    json!({
        "items": [{
            "book": {"_id": "bk1", "title": "Aqoondarro waa u nacab jacayl", "price": 180.0},
            "qty": qty
        }],
        "subtotal": 180.0 * qty as f64,
        "discount": 0.0,
        "total": 180.0 * qty as f64
    })
}

async fn stub_cart(headers: axum::http::HeaderMap) -> Response {
    if let Some(rejection) = reject_stale(&headers) {
        return rejection;
    }
    Json(sample_cart(2)).into_response()
}

async fn stub_cart_update(headers: axum::http::HeaderMap, Json(body): Json<Value>) -> Response {
    if let Some(rejection) = reject_stale(&headers) {
        return rejection;
    }
    Json(sample_cart(body["qty"].as_u64().unwrap_or(1))).into_response()
}

async fn stub_empty(headers: axum::http::HeaderMap) -> Response {
    if let Some(rejection) = reject_stale(&headers) {
        return rejection;
    }
    Json(json!({})).into_response()
}

async fn stub_create_order(headers: axum::http::HeaderMap) -> Response {
    if let Some(rejection) = reject_stale(&headers) {
        return rejection;
    }
    Json(json!({"orderId": "order-1"})).into_response()
}

async fn stub_orders(headers: axum::http::HeaderMap) -> Response {
    if let Some(rejection) = reject_stale(&headers) {
        return rejection;
    }
    Json(json!({"orders": []})).into_response()
}

async fn stub_pay(headers: axum::http::HeaderMap, Path(_id): Path<String>) -> Response {
    if let Some(rejection) = reject_stale(&headers) {
        return rejection;
    }
    if bearer(&headers) == Some("declined-token") {
        return Json(json!({"success": false, "error": "Insufficient balance"})).into_response();
    }
    Json(json!({
        "success": true,
        "message": "Payment completed",
        "waafiResponse": {"params": {"transactionId": "TX-77", "state": "APPROVED"}}
    }))
    .into_response()
}

async fn stub_coupons() -> Json<Value> {
    Json(json!([{"_id": "cp1", "code": "SAVE10", "type": "percent", "value": 10.0}]))
}

async fn stub_create_coupon(Json(body): Json<Value>) -> Response {
    if body["code"].as_str() == Some("SAVE10") {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "Coupon code already exists"})),
        )
            .into_response();
    }
    Json(json!({
        "_id": "cp2",
        "code": body["code"],
        "type": body["type"],
        "value": body["value"]
    }))
    .into_response()
}

/// Deletes succeed for any id except `locked`, which the backend refuses.
async fn stub_delete(headers: axum::http::HeaderMap, Path(id): Path<String>) -> Response {
    if let Some(rejection) = reject_stale(&headers) {
        return rejection;
    }
    if id == "locked" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "Record is still referenced"})),
        )
            .into_response();
    }
    Json(json!({})).into_response()
}

async fn stub_users() -> Json<Value> {
    Json(json!({"users": [{
        "_id": "u2",
        "name": "Hodan",
        "email": "hodan@maktaba.example",
        "role": "user",
        "createdAt": "2026-01-15T10:00:00Z"
    }]}))
}
