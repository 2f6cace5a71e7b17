//! Money display helpers.
//!
//! The backend sends prices and totals as plain JSON numbers in Ethiopian
//! birr. Amounts are never computed client-side beyond display arithmetic,
//! so a formatting helper over `f64` is all the client needs.

/// Format an amount for display, e.g. `ETB 12.50`.
#[must_use]
pub fn format_money(amount: f64) -> String {
    format!("ETB {amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_decimal_places() {
        assert_eq!(format_money(12.5), "ETB 12.50");
        assert_eq!(format_money(0.0), "ETB 0.00");
    }

    #[test]
    fn test_rounds_to_cents() {
        assert_eq!(format_money(19.999), "ETB 20.00");
    }
}
