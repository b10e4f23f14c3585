//! # Database Persistence Layer
//!
//! Optional Postgres persistence via SQLx. When `DATABASE_URL` is set, the
//! credential cache and coach verdict records survive restarts; when it is
//! absent the API runs on the in-memory stores and logs a warning.
//!
//! Two tables, owned by this service:
//! - `verified_credentials` — the credential cache keyed by directory
//!   identifier ([`credentials::PgCredentialStore`]).
//! - `coach_credential_claims` — one row per verification attempt, the
//!   source for duplicate-claim checks ([`coaches::PgCoachRegistry`]).

pub mod coaches;
pub mod credentials;

use sqlx::postgres::{PgPool, PgPoolOptions};

pub use coaches::PgCoachRegistry;
pub use credentials::PgCredentialStore;

/// Initialize the connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 Verified credentials will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Map any SQLx failure into the store error surfaced to the pipeline.
pub(crate) fn store_error(e: sqlx::Error) -> accredo_verify::store::StoreError {
    accredo_verify::store::StoreError::Backend {
        reason: e.to_string(),
    }
}
