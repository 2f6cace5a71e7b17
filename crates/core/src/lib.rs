//! Maktaba Core - Shared types library.
//!
//! This crate provides common types used across all Maktaba components:
//! - `api` - Client for the bookstore REST backend
//! - `storefront` - Public-facing bookstore site
//! - `admin` - Internal administration console
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, phone numbers,
//!   money formatting, and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
