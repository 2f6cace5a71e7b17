//! Admin console access control and management flows.

use maktaba_integration_tests::{browser, sign_in, spawn_admin, spawn_backend};

#[tokio::test]
async fn shopper_accounts_are_turned_away_at_the_door() {
    let backend = spawn_backend().await;
    let admin = spawn_admin(&backend.url()).await;
    let origin = format!("http://{admin}");
    let client = browser();

    let login = sign_in(&client, &origin, "shopper@maktaba.example").await;
    assert!(login.status().is_success(), "rejection re-renders the form");
    let body = login.text().await.expect("login body");
    assert!(body.contains("does not have admin access"));

    // No session was created.
    let dashboard = client
        .get(format!("{origin}/"))
        .send()
        .await
        .expect("dashboard");
    assert!(dashboard.status().is_redirection());
    assert_eq!(
        dashboard.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/auth/login")
    );
}

#[tokio::test]
async fn admin_signs_in_and_sees_the_dashboard() {
    let backend = spawn_backend().await;
    let admin = spawn_admin(&backend.url()).await;
    let origin = format!("http://{admin}");
    let client = browser();

    let login = sign_in(&client, &origin, "admin@maktaba.example").await;
    assert!(login.status().is_redirection());
    assert_eq!(
        login.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/")
    );

    let dashboard = client
        .get(format!("{origin}/"))
        .send()
        .await
        .expect("dashboard");
    assert!(dashboard.status().is_success());
    let body = dashboard.text().await.expect("dashboard body");
    assert!(body.contains("Dashboard"));
    assert!(body.contains("Revenue"));
}

#[tokio::test]
async fn duplicate_coupon_code_shows_inline_error_with_list_intact() {
    let backend = spawn_backend().await;
    let admin = spawn_admin(&backend.url()).await;
    let origin = format!("http://{admin}");
    let client = browser();

    sign_in(&client, &origin, "admin@maktaba.example").await;

    let response = client
        .post(format!("{origin}/coupons"))
        .form(&[("code", "save10"), ("kind", "percent"), ("value", "10")])
        .send()
        .await
        .expect("coupon create");
    assert!(response.status().is_success(), "conflict re-renders the page");
    let body = response.text().await.expect("coupons body");
    assert!(body.contains("Coupon code already exists"));
    // The existing coupon is still listed and the typed code is kept.
    assert!(body.contains("SAVE10"));
}

#[tokio::test]
async fn fresh_coupon_code_is_accepted() {
    let backend = spawn_backend().await;
    let admin = spawn_admin(&backend.url()).await;
    let origin = format!("http://{admin}");
    let client = browser();

    sign_in(&client, &origin, "admin@maktaba.example").await;

    let response = client
        .post(format!("{origin}/coupons"))
        .form(&[("code", "eid25"), ("kind", "fixed"), ("value", "25")])
        .send()
        .await
        .expect("coupon create");
    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/coupons")
    );
}

#[tokio::test]
async fn delete_succeeds_only_after_the_backend_acknowledges() {
    let backend = spawn_backend().await;
    let admin = spawn_admin(&backend.url()).await;
    let origin = format!("http://{admin}");
    let client = browser();

    sign_in(&client, &origin, "admin@maktaba.example").await;

    // The listing asks for confirmation before any delete request is sent.
    let listing = client
        .get(format!("{origin}/coupons"))
        .send()
        .await
        .expect("coupons page");
    let body = listing.text().await.expect("coupons body");
    assert!(body.contains("hx-confirm"));
    assert!(body.contains("hx-delete"));

    let response = client
        .delete(format!("{origin}/coupons/cp1"))
        .send()
        .await
        .expect("coupon delete");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(backend.hit_count("DELETE /api/v1/coupons/cp1"), 1);
}

#[tokio::test]
async fn refused_delete_returns_an_error_so_the_row_stays() {
    let backend = spawn_backend().await;
    let admin = spawn_admin(&backend.url()).await;
    let origin = format!("http://{admin}");
    let client = browser();

    sign_in(&client, &origin, "admin@maktaba.example").await;

    // A non-2xx response means HTMX performs no swap and the row survives.
    let response = client
        .delete(format!("{origin}/coupons/locked"))
        .send()
        .await
        .expect("coupon delete");
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);
    assert_eq!(backend.hit_count("DELETE /api/v1/coupons/locked"), 1);

    let response = client
        .delete(format!("{origin}/books/locked"))
        .send()
        .await
        .expect("book delete");
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);
    assert_eq!(backend.hit_count("DELETE /api/v1/books/locked"), 1);
}

#[tokio::test]
async fn user_listing_renders_accounts_from_the_backend() {
    let backend = spawn_backend().await;
    let admin = spawn_admin(&backend.url()).await;
    let origin = format!("http://{admin}");
    let client = browser();

    sign_in(&client, &origin, "admin@maktaba.example").await;

    let response = client
        .get(format!("{origin}/users"))
        .send()
        .await
        .expect("users page");
    assert!(response.status().is_success());
    let body = response.text().await.expect("users body");
    assert!(body.contains("hodan@maktaba.example"));

    assert_eq!(backend.hit_count("GET /api/v1/users"), 1);
}
