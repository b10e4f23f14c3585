//! Directory client error types.

/// Errors from fetching an accreditation directory page.
///
/// None of these reject a coach outright: the orchestrator downgrades every
/// variant to a pending-manual-review verdict, because directory
/// availability is outside this system's control.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// No scraping-proxy credential is configured. Direct unthrottled
    /// scraping of the target site is never attempted as a fallback.
    #[error("scraping proxy unavailable: {reason}")]
    ScrapingUnavailable {
        /// Why the proxy cannot be used.
        reason: String,
    },

    /// The request exceeded its timeout budget.
    #[error("directory fetch timed out after {elapsed_ms}ms")]
    Timeout {
        /// Budget that was exceeded, in milliseconds.
        elapsed_ms: u64,
    },

    /// Transport failure or a 5xx from the proxy/directory.
    #[error("directory unreachable: {reason}")]
    Unreachable {
        /// Diagnostic context: operation, status, body excerpt.
        reason: String,
    },
}

impl DirectoryError {
    /// Whether a first-attempt failure warrants the single rendered retry.
    /// Timeouts and transport/5xx failures are retryable; a missing proxy
    /// credential is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Unreachable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability() {
        assert!(DirectoryError::Timeout { elapsed_ms: 30_000 }.is_retryable());
        assert!(DirectoryError::Unreachable {
            reason: "HTTP 502".into()
        }
        .is_retryable());
        assert!(!DirectoryError::ScrapingUnavailable {
            reason: "no credential".into()
        }
        .is_retryable());
    }

    #[test]
    fn display_includes_context() {
        let err = DirectoryError::Timeout { elapsed_ms: 45_000 };
        assert!(err.to_string().contains("45000"));
    }
}
