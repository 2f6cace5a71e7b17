//! Checkout and payment route handlers.
//!
//! Checkout is a strict two-step sequence: create the order from the
//! server cart, then charge it. A failed charge stops the flow on the
//! checkout form; the created-but-unpaid order is left for the backend to
//! reconcile. Only a reported-successful payment may reach the success
//! page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use maktaba_api::types::{Cart, ShippingAddress};
use maktaba_core::{OrderId, PhoneNumber};

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::{CheckoutOutcome, CurrentUser, session_keys};
use crate::state::AppState;

/// Shipping form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutTemplate {
    pub user: Option<CurrentUser>,
    pub cart: Cart,
    pub form: CheckoutForm,
    pub errors: Vec<String>,
}

/// Payment success page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct PaymentSuccessTemplate {
    pub user: Option<CurrentUser>,
    pub outcome: CheckoutOutcome,
}

/// Post-gateway landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/return.html")]
pub struct PaymentReturnTemplate {
    pub user: Option<CurrentUser>,
    pub last_order_id: Option<OrderId>,
}

/// Display the checkout form.
#[instrument(skip(state, auth))]
pub async fn form(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
) -> Result<Response> {
    let cart = state.api().get_cart(&auth.token).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok(CheckoutTemplate {
        user: Some(auth.user),
        cart,
        form: CheckoutForm::default(),
        errors: Vec::new(),
    }
    .into_response())
}

/// Place the order and charge it.
#[instrument(skip(state, auth, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let (address, errors) = validate_shipping(&form);

    let Some(address) = address else {
        let cart = state.api().get_cart(&auth.token).await?;
        return Ok(CheckoutTemplate {
            user: Some(auth.user),
            cart,
            form,
            errors,
        }
        .into_response());
    };

    // Step 1: create the order from the server cart.
    let created = state.api().create_order(&auth.token, &address).await?;
    session
        .insert(session_keys::LAST_ORDER_ID, &created.order_id)
        .await?;

    // Step 2: charge it. A declined payment stops here; the shopper never
    // sees the success page.
    let payment = state
        .api()
        .pay_order(&auth.token, &created.order_id)
        .await?;

    if !payment.success {
        let message = payment
            .error
            .or(payment.message)
            .unwrap_or_else(|| "Payment failed. Please try again.".to_string());
        tracing::warn!(order_id = %created.order_id, "Payment declined: {message}");

        let cart = state.api().get_cart(&auth.token).await?;
        return Ok(CheckoutTemplate {
            user: Some(auth.user),
            cart,
            form,
            errors: vec![message],
        }
        .into_response());
    }

    let outcome = CheckoutOutcome {
        order_id: created.order_id,
        message: payment
            .message
            .unwrap_or_else(|| "Payment completed".to_string()),
        provider_response: payment.waafi_response,
    };
    session
        .insert(session_keys::CHECKOUT_OUTCOME, &outcome)
        .await?;

    Ok(Redirect::to("/payment/success").into_response())
}

/// Display the payment confirmation page.
///
/// Consumes the stashed checkout outcome; arriving here without one (deep
/// link, refresh after viewing) goes back to the cart.
#[instrument(skip(auth, session))]
pub async fn payment_success(
    RequireUser(auth): RequireUser,
    session: Session,
) -> Result<Response> {
    let outcome: Option<CheckoutOutcome> =
        session.remove(session_keys::CHECKOUT_OUTCOME).await?;

    let Some(outcome) = outcome else {
        return Ok(Redirect::to("/cart").into_response());
    };

    Ok(PaymentSuccessTemplate {
        user: Some(auth.user),
        outcome,
    }
    .into_response())
}

/// Display the post-gateway landing page with the most recent order id.
#[instrument(skip(auth, session))]
pub async fn payment_return(
    RequireUser(auth): RequireUser,
    session: Session,
) -> Result<PaymentReturnTemplate> {
    let last_order_id: Option<OrderId> = session.get(session_keys::LAST_ORDER_ID).await?;

    Ok(PaymentReturnTemplate {
        user: Some(auth.user),
        last_order_id,
    })
}

/// Validate the shipping form. Returns the normalized address when every
/// check passes, otherwise the list of problems.
fn validate_shipping(form: &CheckoutForm) -> (Option<ShippingAddress>, Vec<String>) {
    let mut errors = Vec::new();

    let required = [
        ("Full name", form.name.trim()),
        ("Phone number", form.phone.trim()),
        ("Street", form.street.trim()),
        ("District", form.district.trim()),
        ("City", form.city.trim()),
        ("Country", form.country.trim()),
    ];
    for (field, value) in required {
        if value.is_empty() {
            errors.push(format!("{field} is required"));
        }
    }

    let phone = match PhoneNumber::parse(&form.phone) {
        Ok(phone) => Some(phone),
        Err(_) => {
            if !form.phone.trim().is_empty() {
                errors.push("Phone must be a valid Somali mobile number (6XXXXXXXX)".to_string());
            }
            None
        }
    };

    if !errors.is_empty() {
        return (None, errors);
    }

    let Some(phone) = phone else {
        return (None, vec!["Phone number is required".to_string()]);
    };

    let label = form.label.trim();
    let address = ShippingAddress {
        label: if label.is_empty() {
            "Home".to_string()
        } else {
            label.to_string()
        },
        name: form.name.trim().to_string(),
        phone: phone.to_string(),
        street: form.street.trim().to_string(),
        district: form.district.trim().to_string(),
        city: form.city.trim().to_string(),
        country: form.country.trim().to_string(),
    };

    (Some(address), Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> CheckoutForm {
        CheckoutForm {
            label: String::new(),
            name: "Ayaan Warsame".to_string(),
            phone: "612345678".to_string(),
            street: "KM4".to_string(),
            district: "Hodan".to_string(),
            city: "Mogadishu".to_string(),
            country: "Somalia".to_string(),
        }
    }

    #[test]
    fn test_complete_form_passes_and_normalizes_phone() {
        let (address, errors) = validate_shipping(&complete_form());
        assert!(errors.is_empty());
        let address = address.expect("address");
        assert_eq!(address.phone, "+252612345678");
        assert_eq!(address.label, "Home");
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let form = CheckoutForm {
            phone: "612345678".to_string(),
            ..CheckoutForm::default()
        };
        let (address, errors) = validate_shipping(&form);
        assert!(address.is_none());
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_invalid_phone_blocks_submission() {
        let form = CheckoutForm {
            phone: "512345678".to_string(),
            ..complete_form()
        };
        let (address, errors) = validate_shipping(&form);
        assert!(address.is_none());
        assert!(errors.iter().any(|e| e.contains("Phone")));
    }

    #[test]
    fn test_prefixed_phone_is_accepted() {
        let form = CheckoutForm {
            phone: "+252612345678".to_string(),
            ..complete_form()
        };
        let (address, errors) = validate_shipping(&form);
        assert!(errors.is_empty());
        assert_eq!(address.expect("address").phone, "+252612345678");
    }
}
