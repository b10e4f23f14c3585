//! # Application State and Configuration
//!
//! [`AppState`] is cloned into every handler; it carries the shared
//! [`CredentialVerifier`] and the optional Postgres pool. Configuration is
//! read from the environment once at startup in [`AppConfig::from_env`] —
//! handlers never touch process state.

use std::sync::Arc;

use sqlx::PgPool;

use accredo_directory::{DirectoryFetcher, ProxyConfig};
use accredo_verify::store::{InMemoryCoachRegistry, InMemoryCredentialStore};
use accredo_verify::CredentialVerifier;

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port to bind.
    pub port: u16,
    /// Scraping-proxy configuration for directory fetches.
    pub proxy: ProxyConfig,
}

impl AppConfig {
    /// Build from environment variables:
    /// - `ACCREDO_PORT` (default 8080)
    /// - `SCRAPER_PROXY_KEY` / `SCRAPER_PROXY_ENDPOINT` (see [`ProxyConfig::from_env`])
    pub fn from_env() -> Self {
        let port = std::env::var("ACCREDO_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(8080);
        Self {
            port,
            proxy: ProxyConfig::from_env(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The verification pipeline, shared across handlers.
    pub verifier: Arc<CredentialVerifier>,
    /// Postgres pool when `DATABASE_URL` is configured; `None` in
    /// in-memory-only mode. Used by the readiness probe.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// State around an already-assembled verifier.
    pub fn new(verifier: CredentialVerifier, db_pool: Option<PgPool>) -> Self {
        Self {
            verifier: Arc::new(verifier),
            db_pool,
        }
    }

    /// Fully in-memory state with the given fetcher: no database, no
    /// persistence across restarts. Used by tests and development setups.
    pub fn in_memory(fetcher: Box<dyn DirectoryFetcher>) -> Self {
        let verifier = CredentialVerifier::new(
            fetcher,
            Box::new(InMemoryCredentialStore::new()),
            Box::new(InMemoryCoachRegistry::new()),
        );
        Self::new(verifier, None)
    }
}
