//! Backend token rejection tears the session down everywhere.

use maktaba_integration_tests::{browser, sign_in, spawn_backend, spawn_storefront};

#[tokio::test]
async fn backend_401_redirects_to_login_and_clears_the_session() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend.url()).await;
    let origin = format!("http://{storefront}");
    let client = browser();

    // Login succeeds, but the token the backend handed out is rejected on
    // every later call, as if it had expired mid-session.
    let login = sign_in(&client, &origin, "stale@maktaba.example").await;
    assert!(login.status().is_redirection());

    let orders = client
        .get(format!("{origin}/orders"))
        .send()
        .await
        .expect("orders page");
    assert!(orders.status().is_redirection());
    assert_eq!(
        orders.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/auth/login")
    );
    assert_eq!(
        orders.headers().get("HX-Redirect").and_then(|v| v.to_str().ok()),
        Some("/auth/login")
    );

    // The session is gone: the next authenticated page bounces straight to
    // login without the backend ever being asked.
    let backend_calls_before = backend.hit_count("GET /api/v1/orders");
    let cart = client
        .get(format!("{origin}/cart"))
        .send()
        .await
        .expect("cart page");
    assert!(cart.status().is_redirection());
    assert_eq!(
        cart.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/auth/login")
    );
    assert_eq!(backend.hit_count("GET /api/v1/cart"), 0);
    assert_eq!(backend.hit_count("GET /api/v1/orders"), backend_calls_before);
}

#[tokio::test]
async fn anonymous_visitors_are_sent_to_login_for_account_pages() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend.url()).await;
    let origin = format!("http://{storefront}");
    let client = browser();

    for path in ["/orders", "/cart", "/checkout"] {
        let response = client
            .get(format!("{origin}{path}"))
            .send()
            .await
            .expect("protected page");
        assert!(response.status().is_redirection(), "{path} should redirect");
        assert_eq!(
            response.headers().get("location").and_then(|v| v.to_str().ok()),
            Some("/auth/login"),
            "{path} should point at login"
        );
    }
}
