//! Custom Askama template filters.

use std::borrow::Borrow;
use std::fmt::Display;

use maktaba_core::format_money;

/// Formats an amount as a display price, e.g. `ETB 12.50`.
///
/// Usage in templates: `{{ order.total|money }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn money(amount: impl Borrow<f64>, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(*amount.borrow()))
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}
