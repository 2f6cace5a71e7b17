//! Domain models for the storefront.

pub mod session;

pub use session::{CheckoutOutcome, CurrentUser, keys as session_keys};
