//! Somali mobile phone number type.
//!
//! Checkout requires a mobile number the payment provider can charge.
//! Accepted input forms are `6XXXXXXXX`, `2526XXXXXXXX`, and
//! `+2526XXXXXXXX`; all are normalized to the canonical `+2526XXXXXXXX`
//! before being sent to the backend.

use core::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Pattern for Somali mobile numbers, with an optional country prefix.
const MOBILE_PATTERN: &str = r"^(\+?252)?6[0-9]{8}$";

fn mobile_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // pattern is a compile-time constant
        Regex::new(MOBILE_PATTERN).unwrap()
    })
}

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input does not match the Somali mobile format.
    #[error("enter a valid Somali mobile number (e.g., 611234567 or +252611234567)")]
    InvalidFormat,
}

/// A Somali mobile phone number in canonical `+2526XXXXXXXX` form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse and normalize a phone number.
    ///
    /// Whitespace is trimmed. A recognized `252` or `+252` prefix is
    /// stripped before the canonical prefix is applied, so all accepted
    /// spellings of the same number normalize identically.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for blank input and
    /// [`PhoneError::InvalidFormat`] when the digits do not match the
    /// Somali mobile pattern.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !mobile_regex().is_match(trimmed) {
            return Err(PhoneError::InvalidFormat);
        }

        let bare = trimmed
            .strip_prefix("+252")
            .or_else(|| trimmed.strip_prefix("252"))
            .unwrap_or(trimmed);

        Ok(Self(format!("+252{bare}")))
    }

    /// Returns the normalized number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_digits_get_prefixed() {
        let phone = PhoneNumber::parse("611234567").unwrap();
        assert_eq!(phone.as_str(), "+252611234567");
    }

    #[test]
    fn test_plus_prefixed_unchanged() {
        let phone = PhoneNumber::parse("+252611234567").unwrap();
        assert_eq!(phone.as_str(), "+252611234567");
    }

    #[test]
    fn test_country_code_without_plus() {
        let phone = PhoneNumber::parse("252611234567").unwrap();
        assert_eq!(phone.as_str(), "+252611234567");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let phone = PhoneNumber::parse("  611234567 ").unwrap();
        assert_eq!(phone.as_str(), "+252611234567");
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(PhoneNumber::parse("   "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_wrong_leading_digit_rejected() {
        assert_eq!(
            PhoneNumber::parse("711234567"),
            Err(PhoneError::InvalidFormat)
        );
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!(
            PhoneNumber::parse("61123456"),
            Err(PhoneError::InvalidFormat)
        );
        assert_eq!(
            PhoneNumber::parse("6112345678"),
            Err(PhoneError::InvalidFormat)
        );
    }

    #[test]
    fn test_non_digits_rejected() {
        assert_eq!(
            PhoneNumber::parse("61123456a"),
            Err(PhoneError::InvalidFormat)
        );
    }

    #[test]
    fn test_all_spellings_normalize_identically() {
        let a = PhoneNumber::parse("611234567").unwrap();
        let b = PhoneNumber::parse("252611234567").unwrap();
        let c = PhoneNumber::parse("+252611234567").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }
}
