//! Service binary: configuration from the environment, optional Postgres,
//! then serve the router.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use accredo_api::db;
use accredo_api::state::{AppConfig, AppState};
use accredo_directory::DirectoryClient;
use accredo_verify::store::{InMemoryCoachRegistry, InMemoryCredentialStore};
use accredo_verify::CredentialVerifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    if config.proxy.api_key.is_none() {
        tracing::warn!(
            "SCRAPER_PROXY_KEY not set — directory fetches are disabled and every \
             live verification will defer to manual review"
        );
    }

    let fetcher = DirectoryClient::new(config.proxy.clone())
        .context("failed to build directory client")?;

    let pool = db::init_pool()
        .await
        .context("database initialization failed")?;

    let verifier = match &pool {
        Some(pool) => CredentialVerifier::new(
            Box::new(fetcher),
            Box::new(db::PgCredentialStore::new(pool.clone())),
            Box::new(db::PgCoachRegistry::new(pool.clone())),
        ),
        None => CredentialVerifier::new(
            Box::new(fetcher),
            Box::new(InMemoryCredentialStore::new()),
            Box::new(InMemoryCoachRegistry::new()),
        ),
    };

    let state = AppState::new(verifier, pool);
    let app = accredo_api::app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("accredo-api listening on {addr}");

    axum::serve(listener, app)
        .await
        .context("server error")?;

    Ok(())
}
