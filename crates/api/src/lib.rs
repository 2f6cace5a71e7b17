//! Maktaba API - client for the bookstore REST backend.
//!
//! Every domain operation in the storefront and admin console is a thin
//! call to a single remote REST origin (`/api/v1/...`). This crate is the
//! one shared client for that origin: it owns the base URL, attaches the
//! caller's bearer token, translates HTTP failures into a typed error
//! taxonomy, and caches the public catalog for a short TTL.
//!
//! The backend is authoritative for carts, orders, pricing, stock, and
//! status transitions. Clients never compute totals or enforce transition
//! legality; they display what the backend returns.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
mod error;
pub mod types;

pub use client::{ApiClient, ListBooksQuery, ListOrdersQuery, ListUsersQuery};
pub use error::ApiError;
