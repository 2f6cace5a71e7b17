//! Cart fragment behavior against the stub backend.

use maktaba_integration_tests::{browser, sign_in, spawn_backend, spawn_storefront};

#[tokio::test]
async fn quantity_below_one_never_reaches_the_backend() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend.url()).await;
    let origin = format!("http://{storefront}");
    let client = browser();

    sign_in(&client, &origin, "shopper@maktaba.example").await;

    for qty in ["0", "-3"] {
        let response = client
            .post(format!("{origin}/cart/update"))
            .form(&[("book_id", "bk1"), ("qty", qty)])
            .send()
            .await
            .expect("cart update");
        assert_eq!(response.status(), 204, "qty {qty} should be a no-op");
    }

    assert_eq!(backend.hit_count("PUT /api/v1/cart/item"), 0);
}

#[tokio::test]
async fn valid_quantity_update_returns_the_refreshed_cart() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend.url()).await;
    let origin = format!("http://{storefront}");
    let client = browser();

    sign_in(&client, &origin, "shopper@maktaba.example").await;

    let response = client
        .post(format!("{origin}/cart/update"))
        .form(&[("book_id", "bk1"), ("qty", "3")])
        .send()
        .await
        .expect("cart update");
    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get("HX-Trigger").and_then(|v| v.to_str().ok()),
        Some("cart-updated")
    );

    assert_eq!(backend.hit_count("PUT /api/v1/cart/item"), 1);
}

#[tokio::test]
async fn add_to_cart_returns_the_count_badge() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend.url()).await;
    let origin = format!("http://{storefront}");
    let client = browser();

    sign_in(&client, &origin, "shopper@maktaba.example").await;

    let response = client
        .post(format!("{origin}/cart/add"))
        .form(&[("book_id", "bk1"), ("qty", "1")])
        .send()
        .await
        .expect("cart add");
    assert!(response.status().is_success());
    let body = response.text().await.expect("badge body");
    assert!(body.contains("(2)"), "badge shows the stub cart's two units");
}

#[tokio::test]
async fn signed_out_count_is_empty_without_backend_calls() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend.url()).await;
    let origin = format!("http://{storefront}");
    let client = browser();

    let response = client
        .get(format!("{origin}/cart/count"))
        .send()
        .await
        .expect("cart count");
    assert!(response.status().is_success());

    assert_eq!(backend.hit_count("GET /api/v1/cart"), 0);
}
