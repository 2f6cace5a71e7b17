//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The backend owns the cart; every mutation returns the authoritative
//! server cart which replaces whatever was rendered before.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use maktaba_api::ApiError;
use maktaba_api::types::Cart;
use maktaba_core::BookId;

use crate::error::Result;
use crate::filters;
use crate::middleware::{OptionalUser, RequireUser};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub book_id: BookId,
    pub qty: Option<u32>,
}

/// Update quantity form data.
///
/// Signed so a decremented-to-zero value arrives intact instead of failing
/// form deserialization.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub book_id: BookId,
    pub qty: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub book_id: BookId,
}

/// Coupon form data.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    pub code: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub user: Option<CurrentUser>,
    pub cart: Cart,
    pub coupon_error: Option<String>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: Cart,
    pub coupon_error: Option<String>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display the cart page.
#[instrument(skip(state, auth))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
) -> Result<CartShowTemplate> {
    let cart = state.api().get_cart(&auth.token).await?;

    Ok(CartShowTemplate {
        user: Some(auth.user),
        cart,
        coupon_error: None,
    })
}

/// Add an item to the cart (HTMX).
///
/// Returns the cart count badge plus an HTMX trigger so other fragments
/// refresh themselves.
#[instrument(skip(state, auth))]
pub async fn add(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let qty = form.qty.unwrap_or(1).max(1);
    let cart = state
        .api()
        .add_to_cart(&auth.token, &form.book_id, qty)
        .await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.unit_count(),
        },
    )
        .into_response())
}

/// Add an item to the cart and go straight to checkout.
#[instrument(skip(state, auth))]
pub async fn buy_now(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let qty = form.qty.unwrap_or(1).max(1);
    state
        .api()
        .add_to_cart(&auth.token, &form.book_id, qty)
        .await?;

    Ok(Redirect::to("/checkout"))
}

/// Set a line item's quantity (HTMX).
///
/// A quantity below 1 never reaches the backend: the response is an empty
/// 204, which HTMX leaves unswapped, so the rendered cart stays as it was.
/// The template also disables the decrement button at quantity 1.
#[instrument(skip(state, auth))]
pub async fn update(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let Ok(qty) = u32::try_from(form.qty) else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };
    if qty < 1 {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let cart = state
        .api()
        .update_cart_item(&auth.token, &form.book_id, qty)
        .await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart,
            coupon_error: None,
        },
    )
        .into_response())
}

/// Remove a line item (HTMX). The template asks for confirmation with
/// `hx-confirm` before this request is ever sent.
#[instrument(skip(state, auth))]
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let cart = state
        .api()
        .remove_from_cart(&auth.token, &form.book_id)
        .await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart,
            coupon_error: None,
        },
    )
        .into_response())
}

/// Empty the cart (HTMX, behind `hx-confirm`).
#[instrument(skip(state, auth))]
pub async fn clear(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
) -> Result<Response> {
    state.api().clear_cart(&auth.token).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: Cart::default(),
            coupon_error: None,
        },
    )
        .into_response())
}

/// Apply a coupon code to the cart (HTMX).
///
/// An unknown or expired code re-renders the cart unchanged with an inline
/// message.
#[instrument(skip(state, auth, form))]
pub async fn apply_coupon(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Form(form): Form<CouponForm>,
) -> Result<Response> {
    let code = form.code.trim();
    if code.is_empty() {
        let cart = state.api().get_cart(&auth.token).await?;
        return Ok(CartItemsTemplate {
            cart,
            coupon_error: Some("Enter a coupon code".to_string()),
        }
        .into_response());
    }

    match state.api().apply_coupon(&auth.token, code).await {
        Ok(cart) => Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate {
                cart,
                coupon_error: None,
            },
        )
            .into_response()),
        Err(ApiError::Api { message, .. } | ApiError::Conflict(message)) => {
            let cart = state.api().get_cart(&auth.token).await?;
            Ok(CartItemsTemplate {
                cart,
                coupon_error: Some(message),
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Get the cart count badge (HTMX). Signed-out visitors see zero.
#[instrument(skip(state, user))]
pub async fn count(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<CartCountTemplate> {
    let count = match user {
        Some(auth) => state.api().get_cart(&auth.token).await?.unit_count(),
        None => 0,
    };

    Ok(CartCountTemplate { count })
}
