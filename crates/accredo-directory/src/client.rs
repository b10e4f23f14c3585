//! # Scraping-Proxy Directory Client
//!
//! Fetches accreditation directory pages through a third-party scraping
//! proxy capable of optionally rendering JavaScript. The proxy credential is
//! injected at construction — never read from the environment inside the
//! fetch path — so "credential absent" behavior is testable without
//! touching process state.
//!
//! ## Fetch policy
//!
//! 1. Attempt the cheaper non-rendering fetch (30s budget).
//! 2. On a 5xx, transport failure, or timeout — the signatures of anti-bot
//!    blocking — retry once with rendering enabled and a doubled budget.
//! 3. A failure on the rendered attempt is terminal.
//!
//! With no proxy credential configured the client reports
//! [`DirectoryError::ScrapingUnavailable`] immediately. It must never fall
//! back to fetching the target directly: unthrottled direct scraping of the
//! directory is exactly the failure mode this client exists to avoid.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use accredo_core::EiaReference;

use crate::error::DirectoryError;
use crate::fetcher::DirectoryFetcher;

/// EMCC EIA awards search page.
pub const EMCC_AWARDS_URL: &str = "https://www.emccglobal.org/accreditation/eia/eia-awards/";

/// ICF credentialed-coach search page.
pub const ICF_SEARCH_URL: &str = "https://apps.coachingfederation.org/eweb/CCFDynamicPage.aspx";

/// Default scraping proxy endpoint.
const DEFAULT_PROXY_ENDPOINT: &str = "https://api.scraperapi.com/";

/// Non-rendering fetch budget.
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Rendering fetch budget — a remote browser render is materially slower.
const RENDER_TIMEOUT_SECS: u64 = 60;

/// Configuration for the scraping-proxy client.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Scraping proxy API key. `None` means automated fetching is
    /// unavailable and every live verification defers to manual review.
    pub api_key: Option<String>,
    /// Proxy endpoint URL.
    pub endpoint: String,
    /// Non-rendering fetch timeout in seconds.
    pub fetch_timeout_secs: u64,
    /// Rendering fetch timeout in seconds.
    pub render_timeout_secs: u64,
}

impl ProxyConfig {
    /// Configuration with a proxy credential and default endpoint/timeouts.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::disabled()
        }
    }

    /// Configuration with no proxy credential: every fetch reports
    /// [`DirectoryError::ScrapingUnavailable`].
    pub fn disabled() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_PROXY_ENDPOINT.to_string(),
            fetch_timeout_secs: FETCH_TIMEOUT_SECS,
            render_timeout_secs: RENDER_TIMEOUT_SECS,
        }
    }

    /// Build from `SCRAPER_PROXY_KEY` / `SCRAPER_PROXY_ENDPOINT`. Intended
    /// for the service binary only — library code takes the struct.
    pub fn from_env() -> Self {
        let mut config = match std::env::var("SCRAPER_PROXY_KEY") {
            Ok(key) if !key.trim().is_empty() => Self::new(key),
            _ => Self::disabled(),
        };
        if let Ok(endpoint) = std::env::var("SCRAPER_PROXY_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                config.endpoint = endpoint;
            }
        }
        config
    }
}

/// HTTP client for accreditation directory pages, routed through the
/// scraping proxy.
#[derive(Debug)]
pub struct DirectoryClient {
    http: reqwest::Client,
    config: ProxyConfig,
}

impl DirectoryClient {
    /// Build a client from configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| DirectoryError::Unreachable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { http, config })
    }

    /// One proxy round trip. `render` asks the proxy for a full browser
    /// render of the target page.
    async fn attempt(
        &self,
        api_key: &str,
        target_url: &str,
        render: bool,
        timeout_secs: u64,
    ) -> Result<String, DirectoryError> {
        let resp = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("api_key", api_key),
                ("url", target_url),
                ("render", if render { "true" } else { "false" }),
            ])
            .timeout(Duration::from_secs(timeout_secs))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DirectoryError::Timeout {
                        elapsed_ms: timeout_secs * 1000,
                    }
                } else {
                    DirectoryError::Unreachable {
                        reason: format!("proxy request failed: {e}"),
                    }
                }
            })?;

        let status = resp.status();
        if status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DirectoryError::Unreachable {
                reason: format!("HTTP {status} — {}", excerpt(&body)),
            });
        }
        if status.is_client_error() {
            // 401/403 from the proxy itself: bad or exhausted credential.
            let body = resp.text().await.unwrap_or_default();
            return Err(DirectoryError::ScrapingUnavailable {
                reason: format!("proxy rejected request: HTTP {status} — {}", excerpt(&body)),
            });
        }

        resp.text().await.map_err(|e| DirectoryError::Unreachable {
            reason: format!("failed to read response body: {e}"),
        })
    }
}

#[async_trait]
impl DirectoryFetcher for DirectoryClient {
    async fn fetch_page(&self, target_url: &str) -> Result<String, DirectoryError> {
        let api_key =
            self.config
                .api_key
                .as_deref()
                .ok_or_else(|| DirectoryError::ScrapingUnavailable {
                    reason: "no scraping proxy credential configured".to_string(),
                })?;

        match self
            .attempt(api_key, target_url, false, self.config.fetch_timeout_secs)
            .await
        {
            Ok(body) => Ok(body),
            Err(e) if e.is_retryable() => {
                tracing::warn!(
                    target_url,
                    error = %e,
                    "plain fetch failed, retrying once with rendering enabled"
                );
                self.attempt(api_key, target_url, true, self.config.render_timeout_secs)
                    .await
            }
            Err(e) => Err(e),
        }
    }

    fn fetcher_name(&self) -> &str {
        "DirectoryClient"
    }
}

/// Search the EMCC awards directory by EIA reference.
pub fn emcc_reference_search_url(reference: &EiaReference) -> String {
    format!("{EMCC_AWARDS_URL}?search=1&reference={}", reference.as_str())
}

/// Search the EMCC awards directory by name. Used as the one fallback when a
/// by-reference search renders no rows for a record that exists.
pub fn emcc_name_search_url(full_name: &str) -> String {
    let (first, last) = split_name(full_name);
    let mut url = Url::parse(EMCC_AWARDS_URL).expect("EMCC base URL is valid");
    url.query_pairs_mut()
        .append_pair("search", "1")
        .append_pair("first_name", first)
        .append_pair("last_name", last);
    url.to_string()
}

/// Search the ICF credential directory by first and last name.
pub fn icf_name_search_url(first_name: &str, last_name: &str) -> String {
    let mut url = Url::parse(ICF_SEARCH_URL).expect("ICF base URL is valid");
    url.query_pairs_mut()
        .append_pair("webcode", "ccfcoachsearch")
        .append_pair("firstname", first_name)
        .append_pair("lastname", last_name);
    url.to_string()
}

/// First token and final token of a full name. A single-token name is used
/// as both parts.
pub fn split_name(full_name: &str) -> (&str, &str) {
    let mut tokens = full_name.split_whitespace();
    let first = tokens.next().unwrap_or_default();
    let last = tokens.last().unwrap_or(first);
    (first, last)
}

/// First ~200 characters of a response body, for diagnostics.
fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((i, _)) => &body[..i],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_new_sets_key_and_defaults() {
        let config = ProxyConfig::new("test-key");
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.render_timeout_secs, 60);
    }

    #[test]
    fn disabled_config_has_no_key() {
        assert!(ProxyConfig::disabled().api_key.is_none());
    }

    #[tokio::test]
    async fn fetch_without_credential_is_scraping_unavailable() {
        let client = DirectoryClient::new(ProxyConfig::disabled()).expect("build");
        let result = client.fetch_page(EMCC_AWARDS_URL).await;
        assert!(matches!(
            result,
            Err(DirectoryError::ScrapingUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn fetch_against_closed_port_is_unreachable_after_retry() {
        // Guaranteed-closed port: both the plain attempt and the rendered
        // retry fail with a transport error.
        let config = ProxyConfig {
            api_key: Some("key".into()),
            endpoint: "http://127.0.0.1:1/".into(),
            fetch_timeout_secs: 1,
            render_timeout_secs: 1,
        };
        let client = DirectoryClient::new(config).expect("build");
        let result = client.fetch_page(EMCC_AWARDS_URL).await;
        assert!(matches!(result, Err(DirectoryError::Unreachable { .. })));
    }

    #[test]
    fn reference_search_url_embeds_normalized_reference() {
        let reference = EiaReference::new("eia20230480").expect("valid");
        let url = emcc_reference_search_url(&reference);
        assert!(url.contains("reference=EIA20230480"));
        assert!(url.contains("search=1"));
    }

    #[test]
    fn name_search_urls_encode_names() {
        let url = emcc_name_search_url("Carole Anne Adams");
        assert!(url.contains("first_name=Carole"));
        assert!(url.contains("last_name=Adams"));

        let url = icf_name_search_url("Jane", "O'Brien");
        assert!(url.contains("firstname=Jane"));
        assert!(url.contains("lastname=O%27Brien"));
    }

    #[test]
    fn split_name_edge_cases() {
        assert_eq!(split_name("Jane Doe"), ("Jane", "Doe"));
        assert_eq!(split_name("Jane Anne Doe"), ("Jane", "Doe"));
        assert_eq!(split_name("Cher"), ("Cher", "Cher"));
        assert_eq!(split_name(""), ("", ""));
    }
}
