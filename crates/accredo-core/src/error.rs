//! # Validation Error Taxonomy
//!
//! Every syntactic check in this crate fails with a distinct
//! [`ValidationError`] variant. The rendered messages are shown to coaches
//! verbatim so they can correct their own input — they name the expected
//! directory, the missing query parameter, or the malformed value rather
//! than reporting a generic failure.

use thiserror::Error;

/// A distinguishable reason a supplied identifier, URL, or name failed
/// syntactic validation. None of these are retried; the coach must correct
/// their input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The supplied string could not be parsed as a URL at all.
    #[error("the link could not be read as a web address — paste the full URL from your browser")]
    MalformedUrl,

    /// The URL points at a different site than the accreditation directory.
    #[error("the link points to {host}, not the {expected} directory")]
    InvalidDomain {
        /// Host found in the supplied URL.
        host: String,
        /// Directory domain the validator expected.
        expected: &'static str,
    },

    /// Right site, wrong page — the path is not the directory search page.
    #[error("the link is on the right site but is not the {expected} search page")]
    WrongPage {
        /// Path component of the supplied URL.
        path: String,
        /// Search path the validator expected.
        expected: &'static str,
    },

    /// EMCC only: the URL is not a submitted search result (`search=1` absent).
    #[error("the link is the search form, not a search result — run the search and copy the result page URL")]
    NotASearchResult,

    /// EMCC only: the `reference` query parameter is absent or empty.
    #[error("the link does not include an EIA reference number — search the directory by reference")]
    MissingReference,

    /// The EIA reference does not match the `EIA` + digits format.
    #[error("'{value}' is not a valid EIA number — it should look like EIA20230480")]
    BadReferenceFormat {
        /// The value that failed the format check.
        value: String,
    },

    /// ICF only: the `webcode` query parameter is absent or names a different
    /// directory page.
    #[error("the link is not an ICF credential directory search")]
    WrongWebcode {
        /// Webcode found in the URL, if any.
        found: Option<String>,
    },

    /// ICF only: neither `firstname` nor `lastname` appears in the URL.
    #[error("the link does not include a name search — search the ICF directory by first and last name")]
    MissingName,

    /// ICF only: a single-field name search. These return too many ambiguous
    /// results to verify reliably, so they are rejected outright.
    #[error("the link searches by only part of a name — search with both first and last name")]
    IncompleteName,

    /// The claimed full name shares no token with the name embedded in the
    /// supplied search URL. Guards against submitting someone else's
    /// search-result link.
    #[error("the name on this search ({url_name}) does not match the name on your profile")]
    NameUrlMismatch {
        /// Name as embedded in the URL, for the user-facing message.
        url_name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_actionable() {
        let err = ValidationError::InvalidDomain {
            host: "example.com".into(),
            expected: "emccglobal.org",
        };
        let msg = err.to_string();
        assert!(msg.contains("example.com"));
        assert!(msg.contains("emccglobal.org"));

        let err = ValidationError::BadReferenceFormat {
            value: "20230480".into(),
        };
        assert!(err.to_string().contains("20230480"));
    }

    #[test]
    fn variants_are_distinguishable() {
        assert_ne!(
            ValidationError::MissingReference,
            ValidationError::NotASearchResult
        );
    }
}
