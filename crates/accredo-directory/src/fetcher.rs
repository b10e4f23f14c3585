//! # Directory Fetcher Trait
//!
//! Abstracts over "fetch this directory page as HTML" so orchestrators can
//! be exercised against canned pages. Production deployments use
//! [`crate::DirectoryClient`]; tests use [`StubFetcher`].
//!
//! Implementations must be `Send + Sync` so they can be shared behind an
//! `Arc` across async tasks, and the trait is object-safe to support
//! runtime selection (stub vs. live).

use async_trait::async_trait;

use crate::error::DirectoryError;

/// Fetches a directory page and returns its HTML.
#[async_trait]
pub trait DirectoryFetcher: Send + Sync {
    /// Fetch `target_url` and return the page body.
    async fn fetch_page(&self, target_url: &str) -> Result<String, DirectoryError>;

    /// Human-readable name of this fetcher implementation, for logs.
    fn fetcher_name(&self) -> &str;
}

/// Canned fetcher for tests and development.
#[derive(Debug, Clone)]
pub enum StubFetcher {
    /// Every fetch returns this HTML.
    Page(String),
    /// Every fetch reports the scraping proxy as unavailable.
    Unavailable(String),
    /// Every fetch reports the directory as unreachable.
    Unreachable(String),
}

impl StubFetcher {
    /// Stub that serves one fixed page.
    pub fn page(html: impl Into<String>) -> Self {
        Self::Page(html.into())
    }
}

#[async_trait]
impl DirectoryFetcher for StubFetcher {
    async fn fetch_page(&self, _target_url: &str) -> Result<String, DirectoryError> {
        match self {
            Self::Page(html) => Ok(html.clone()),
            Self::Unavailable(reason) => Err(DirectoryError::ScrapingUnavailable {
                reason: reason.clone(),
            }),
            Self::Unreachable(reason) => Err(DirectoryError::Unreachable {
                reason: reason.clone(),
            }),
        }
    }

    fn fetcher_name(&self) -> &str {
        "StubFetcher"
    }
}
