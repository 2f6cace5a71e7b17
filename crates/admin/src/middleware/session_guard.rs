//! Session teardown on backend token rejection.
//!
//! Counterpart of the storefront's guard: a 401 from the backend marks
//! the response with [`SessionInvalidated`], and this middleware wipes
//! the session on the way out.

use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use crate::error::SessionInvalidated;

/// Clear the session when a response carries the [`SessionInvalidated`]
/// marker. Clearing an already-empty session is a no-op.
pub async fn session_guard(session: Session, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if response.extensions().get::<SessionInvalidated>().is_some() {
        if let Err(e) = session.flush().await {
            tracing::warn!("Failed to clear rejected session: {e}");
        } else {
            tracing::info!("Cleared admin session after backend token rejection");
        }
    }

    response
}
