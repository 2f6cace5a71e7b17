//! Newtype IDs for type-safe entity references.
//!
//! The bookstore backend assigns opaque string identifiers (Mongo-style
//! `_id` values). Use the `define_id!` macro to create type-safe wrappers
//! that prevent accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use maktaba_core::define_id;
/// define_id!(BookId);
/// define_id!(OrderId);
///
/// let book_id = BookId::new("68a1f3");
/// let order_id = OrderId::new("68a1f3");
///
/// // These are different types, so this won't compile:
/// // let _: BookId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(BookId);
define_id!(CategoryId);
define_id!(CouponId);
define_id!(UserId);
define_id!(OrderId);
define_id!(ReviewId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = BookId::new("68a1f3b2c9");
        assert_eq!(id.as_str(), "68a1f3b2c9");
        assert_eq!(id.to_string(), "68a1f3b2c9");
        assert_eq!(String::from(id), "68a1f3b2c9");
    }

    #[test]
    fn test_serde_transparent() {
        let id: OrderId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(id, OrderId::new("abc123"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");
    }

    #[test]
    fn test_distinct_types_compare_by_value() {
        let a = CategoryId::new("x");
        let b = CategoryId::from("x");
        assert_eq!(a, b);
    }
}
