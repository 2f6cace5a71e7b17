//! HTTP middleware stack for the admin console.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. Request ID (add unique ID to each request)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. Session guard (tear down sessions the backend rejected)

pub mod auth;
pub mod request_id;
pub mod session;
pub mod session_guard;

pub use auth::{AuthedAdmin, RequireAdmin, sign_in_admin, sign_out_admin};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
pub use session_guard::session_guard;
