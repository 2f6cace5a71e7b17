//! Coupon management route handlers.
//!
//! Like categories, the coupon list is fetched whole and paged in the
//! handler. A duplicate code on create keeps the listing exactly as it
//! was and shows the backend's message inline.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use maktaba_api::ApiError;
use maktaba_api::types::{Coupon, CouponInput, CouponType};
use maktaba_core::CouponId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::CurrentAdmin;
use crate::routes::ITEMS_PER_PAGE;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct CouponsListQuery {
    pub page: Option<u32>,
    pub q: Option<String>,
}

/// Coupon listing page template with inline create form.
#[derive(Template, WebTemplate)]
#[template(path = "coupons/index.html")]
pub struct CouponsIndexTemplate {
    pub admin: Option<CurrentAdmin>,
    pub coupons: Vec<Coupon>,
    pub search: String,
    pub current_page: u32,
    pub has_more: bool,
    pub form: CouponForm,
    pub error: Option<String>,
}

/// Coupon edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "coupons/form.html")]
pub struct CouponFormTemplate {
    pub admin: Option<CurrentAdmin>,
    pub coupon_id: String,
    pub form: CouponForm,
    pub error: Option<String>,
}

/// Coupon form data.
#[derive(Debug, Clone, Deserialize)]
pub struct CouponForm {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub value: f64,
}

impl Default for CouponForm {
    fn default() -> Self {
        Self {
            code: String::new(),
            kind: "percent".to_string(),
            value: 0.0,
        }
    }
}

impl CouponForm {
    /// Validate and convert to the backend payload. Codes are stored
    /// uppercase, matching how shoppers type them at the cart.
    fn to_input(&self) -> std::result::Result<CouponInput, String> {
        let code = self.code.trim().to_uppercase();
        if code.is_empty() {
            return Err("Coupon code is required".to_string());
        }

        let coupon_type = match self.kind.as_str() {
            "percent" => CouponType::Percent,
            "fixed" => CouponType::Fixed,
            other => return Err(format!("Unknown coupon type: {other}")),
        };

        if self.value <= 0.0 {
            return Err("Value must be greater than zero".to_string());
        }
        if coupon_type == CouponType::Percent && self.value > 100.0 {
            return Err("A percentage discount cannot exceed 100".to_string());
        }

        Ok(CouponInput {
            code,
            coupon_type,
            value: self.value,
        })
    }
}

impl From<&Coupon> for CouponForm {
    fn from(coupon: &Coupon) -> Self {
        Self {
            code: coupon.code.clone(),
            kind: match coupon.coupon_type {
                CouponType::Percent => "percent".to_string(),
                CouponType::Fixed => "fixed".to_string(),
            },
            value: coupon.value,
        }
    }
}

/// Slice one page out of a filtered coupon list.
fn page_of(coupons: &[Coupon], search: &str, page: u32) -> (Vec<Coupon>, bool) {
    let needle = search.trim().to_lowercase();
    let filtered: Vec<Coupon> = coupons
        .iter()
        .filter(|c| needle.is_empty() || c.code.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    let start = ((page - 1) * ITEMS_PER_PAGE) as usize;
    let end = (start + ITEMS_PER_PAGE as usize).min(filtered.len());
    let has_more = filtered.len() > end;
    let slice = if start >= filtered.len() {
        Vec::new()
    } else {
        filtered[start..end].to_vec()
    };

    (slice, has_more)
}

/// Display the paged coupon listing.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Query(query): Query<CouponsListQuery>,
) -> Result<CouponsIndexTemplate> {
    let current_page = query.page.unwrap_or(1).max(1);
    let search = query.q.unwrap_or_default();

    let all = state.api().list_coupons(&auth.token).await?;
    let (coupons, has_more) = page_of(&all, &search, current_page);

    Ok(CouponsIndexTemplate {
        admin: Some(auth.admin),
        coupons,
        search,
        current_page,
        has_more,
        form: CouponForm::default(),
        error: None,
    })
}

/// Create a coupon.
#[instrument(skip(state, auth, form), fields(code = %form.code))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Form(form): Form<CouponForm>,
) -> Result<Response> {
    let error = match form.to_input() {
        Ok(input) => match state.api().create_coupon(&auth.token, &input).await {
            Ok(_) => None,
            Err(ApiError::Conflict(message) | ApiError::Api { message, .. }) => Some(message),
            Err(e) => return Err(e.into()),
        },
        Err(message) => Some(message),
    };

    let Some(error) = error else {
        return Ok(Redirect::to("/coupons").into_response());
    };

    let all = state.api().list_coupons(&auth.token).await?;
    let (coupons, has_more) = page_of(&all, "", 1);

    Ok(CouponsIndexTemplate {
        admin: Some(auth.admin),
        coupons,
        search: String::new(),
        current_page: 1,
        has_more,
        form,
        error: Some(error),
    }
    .into_response())
}

/// Display the pre-filled coupon form.
#[instrument(skip(state, auth), fields(coupon_id = %id))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<CouponId>,
) -> Result<CouponFormTemplate> {
    let all = state.api().list_coupons(&auth.token).await?;
    let coupon = all
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::NotFound(format!("coupon {id}")))?;

    Ok(CouponFormTemplate {
        admin: Some(auth.admin),
        coupon_id: id.into_inner(),
        form: CouponForm::from(coupon),
        error: None,
    })
}

/// Update a coupon.
#[instrument(skip(state, auth, form), fields(coupon_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<CouponId>,
    Form(form): Form<CouponForm>,
) -> Result<Response> {
    let error = match form.to_input() {
        Ok(input) => match state.api().update_coupon(&auth.token, &id, &input).await {
            Ok(_) => None,
            Err(ApiError::Conflict(message) | ApiError::Api { message, .. }) => Some(message),
            Err(e) => return Err(e.into()),
        },
        Err(message) => Some(message),
    };

    let Some(error) = error else {
        return Ok(Redirect::to("/coupons").into_response());
    };

    Ok(CouponFormTemplate {
        admin: Some(auth.admin),
        coupon_id: id.into_inner(),
        form,
        error: Some(error),
    }
    .into_response())
}

/// Delete a coupon. The row disappears only on a success response.
#[instrument(skip(state, auth), fields(coupon_id = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<CouponId>,
) -> Result<StatusCode> {
    state.api().delete_coupon(&auth.token, &id).await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_uppercases_code() {
        let form = CouponForm {
            code: " save10 ".into(),
            kind: "percent".into(),
            value: 10.0,
        };
        let input = form.to_input().unwrap();
        assert_eq!(input.code, "SAVE10");
        assert_eq!(input.coupon_type, CouponType::Percent);
    }

    #[test]
    fn test_form_caps_percentage_at_hundred() {
        let form = CouponForm {
            code: "BIG".into(),
            kind: "percent".into(),
            value: 150.0,
        };
        assert!(form.to_input().is_err());

        let fixed = CouponForm {
            code: "BIG".into(),
            kind: "fixed".into(),
            value: 150.0,
        };
        assert!(fixed.to_input().is_ok());
    }

    #[test]
    fn test_form_rejects_unknown_kind() {
        let form = CouponForm {
            code: "X".into(),
            kind: "banana".into(),
            value: 5.0,
        };
        assert!(form.to_input().is_err());
    }
}
