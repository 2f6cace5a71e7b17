//! Session teardown on backend token rejection.
//!
//! When any handler hits a 401 from the backend, `AppError::SessionExpired`
//! marks the outgoing response with [`SessionInvalidated`]. This middleware
//! observes the marker and wipes the session, so the browser lands on the
//! sign-in page with no stale credentials left behind.

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
            tracing::info!("Cleared session after backend token rejection");
        }
    }

    response
}
