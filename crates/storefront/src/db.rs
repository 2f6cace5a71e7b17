//! Database pool for the session store.
//!
//! The storefront keeps no domain data locally; Postgres only backs
//! tower-sessions.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a connection pool for the session store.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url.expose_secret())
        .await
}
