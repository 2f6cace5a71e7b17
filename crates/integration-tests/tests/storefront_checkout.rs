//! Checkout and payment flow, end to end against the stub backend.

use maktaba_integration_tests::{browser, sign_in, spawn_backend, spawn_storefront};

const SHIPPING: [(&str, &str); 6] = [
    ("name", "Ayaan Test"),
    ("phone", "612345678"),
    ("street", "Wadada 21 Oktoobar"),
    ("district", "Hodan"),
    ("city", "Mogadishu"),
    ("country", "Somalia"),
];

#[tokio::test]
async fn successful_checkout_lands_on_the_confirmation_page() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend.url()).await;
    let origin = format!("http://{storefront}");
    let client = browser();

    let login = sign_in(&client, &origin, "shopper@maktaba.example").await;
    assert!(login.status().is_redirection());

    let submit = client
        .post(format!("{origin}/checkout"))
        .form(&SHIPPING)
        .send()
        .await
        .expect("checkout submit");
    assert!(submit.status().is_redirection());
    assert_eq!(
        submit.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/payment/success")
    );

    let success = client
        .get(format!("{origin}/payment/success"))
        .send()
        .await
        .expect("success page");
    assert!(success.status().is_success());
    let body = success.text().await.expect("success body");
    assert!(body.contains("order-1"));
    assert!(body.contains("Payment completed"));

    // Order creation and the charge both reached the backend, in order.
    assert_eq!(backend.hit_count("POST /api/v1/orders"), 2);
    assert!(backend.hits().contains(&"POST /api/v1/orders/order-1/pay".to_string()));
}

#[tokio::test]
async fn confirmation_page_is_consumed_after_one_view() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend.url()).await;
    let origin = format!("http://{storefront}");
    let client = browser();

    sign_in(&client, &origin, "shopper@maktaba.example").await;
    client
        .post(format!("{origin}/checkout"))
        .form(&SHIPPING)
        .send()
        .await
        .expect("checkout submit");

    let first = client
        .get(format!("{origin}/payment/success"))
        .send()
        .await
        .expect("first view");
    assert!(first.status().is_success());

    // A refresh has nothing left to show and bounces to the cart.
    let refresh = client
        .get(format!("{origin}/payment/success"))
        .send()
        .await
        .expect("refresh");
    assert!(refresh.status().is_redirection());
    assert_eq!(
        refresh.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/cart")
    );
}

#[tokio::test]
async fn declined_payment_re_renders_the_form_and_never_confirms() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend.url()).await;
    let origin = format!("http://{storefront}");
    let client = browser();

    sign_in(&client, &origin, "declined@maktaba.example").await;

    let submit = client
        .post(format!("{origin}/checkout"))
        .form(&SHIPPING)
        .send()
        .await
        .expect("checkout submit");
    assert!(submit.status().is_success(), "declined charge is not a redirect");
    let body = submit.text().await.expect("form body");
    assert!(body.contains("Insufficient balance"));

    // The confirmation page was never armed.
    let success = client
        .get(format!("{origin}/payment/success"))
        .send()
        .await
        .expect("success page");
    assert!(success.status().is_redirection());

    assert!(backend.hits().contains(&"POST /api/v1/orders/order-1/pay".to_string()));
}

#[tokio::test]
async fn invalid_phone_blocks_order_creation() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend.url()).await;
    let origin = format!("http://{storefront}");
    let client = browser();

    sign_in(&client, &origin, "shopper@maktaba.example").await;

    // Landline-looking number, not a Somali mobile.
    let submit = client
        .post(format!("{origin}/checkout"))
        .form(&[
            ("name", "Ayaan Test"),
            ("phone", "512345678"),
            ("street", "Wadada 21 Oktoobar"),
            ("district", "Hodan"),
            ("city", "Mogadishu"),
            ("country", "Somalia"),
        ])
        .send()
        .await
        .expect("checkout submit");
    assert!(submit.status().is_success());

    assert_eq!(backend.hit_count("POST /api/v1/orders"), 0);
}
