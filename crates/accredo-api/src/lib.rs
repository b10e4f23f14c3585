//! # accredo-api — Axum API Service for Accredo Credential Verification
//!
//! HTTP surface over the verification pipeline in `accredo-verify`.
//!
//! ## API Surface
//!
//! | Prefix                        | Module                 | Domain                      |
//! |-------------------------------|------------------------|-----------------------------|
//! | `/v1/verify/emcc/*`           | [`routes::verify`]     | EMCC award verification     |
//! | `/v1/verify/icf/*`            | [`routes::verify`]     | ICF credential verification |
//! | `/openapi.json`               | [`openapi`]            | OpenAPI spec                |
//! | `/health/*`                   | this module            | Probes                      |
//!
//! ## Persistence
//!
//! Optional: with `DATABASE_URL` set, the credential cache and coach
//! verdict records live in Postgres ([`db`]); without it, everything is
//! in-memory and resets on restart.

pub mod db;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the application router.
///
/// Health probes are mounted alongside the API routes; there is no
/// authentication layer — this service is deployed behind the
/// marketplace's gateway, which terminates auth.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::verify::router())
        .merge(openapi::router())
        // Verification requests are small JSON bodies; 64 KiB is generous.
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http());

    Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .merge(api)
        .with_state(state)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the service can serve traffic.
///
/// Checks the database connection when one is configured. A missing
/// scraping proxy credential does not fail readiness: verification then
/// degrades to pending-manual-review verdicts, which is a served state.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, AppError> {
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return Err(AppError::ServiceUnavailable("database unreachable".into()));
        }
    }
    Ok("ready")
}
