//! # Directory URL and Identifier Validation
//!
//! Per-body syntactic checks applied before any network traffic. These are
//! pure, synchronous, side-effect-free functions; every failure is a
//! distinct [`ValidationError`] variant the orchestrator surfaces verbatim.
//!
//! Coaches verify by pasting a search-result URL from their own browser
//! session, so these checks are the first line of defense against typos,
//! the wrong directory, and — via [`check_name_consistency`] — someone
//! else's search result submitted under a different name.

use url::Url;

use crate::error::ValidationError;
use crate::identity::EiaReference;

/// Domain of the EMCC global directory.
pub const EMCC_DOMAIN: &str = "emccglobal.org";

/// Path of the EMCC EIA-awards search page.
pub const EMCC_AWARDS_PATH: &str = "/accreditation/eia/eia-awards";

/// Domain of the ICF credential directory.
pub const ICF_DOMAIN: &str = "coachingfederation.org";

/// Path fragment of the ICF directory search page.
pub const ICF_SEARCH_PATH: &str = "ccfdynamicpage.aspx";

/// Webcode identifying the ICF credentialed-coach search within their CMS.
pub const ICF_SEARCH_WEBCODE: &str = "ccfcoachsearch";

/// Validate a raw string claimed to be an EMCC directory search-result URL.
///
/// Checks, in order: URL parses, host is the EMCC directory, path is the
/// EIA-awards page, `search=1` is present (the form was actually submitted),
/// a non-empty `reference` parameter exists, and the reference matches the
/// EIA format. Returns the normalized reference on success.
pub fn validate_emcc_url(raw: &str) -> Result<EiaReference, ValidationError> {
    let url = parse_url(raw)?;
    require_host(&url, EMCC_DOMAIN)?;

    if !url.path().to_ascii_lowercase().contains(EMCC_AWARDS_PATH) {
        return Err(ValidationError::WrongPage {
            path: url.path().to_string(),
            expected: EMCC_AWARDS_PATH,
        });
    }

    if query_param(&url, "search").as_deref() != Some("1") {
        return Err(ValidationError::NotASearchResult);
    }

    let reference = query_param(&url, "reference")
        .filter(|value| !value.trim().is_empty())
        .ok_or(ValidationError::MissingReference)?;

    EiaReference::new(reference)
}

/// First and last name pulled out of an ICF directory search URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcfNameParts {
    pub first_name: String,
    pub last_name: String,
}

impl IcfNameParts {
    /// The two parts joined for display ("Jane Doe").
    pub fn full(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Validate a raw string claimed to be an ICF directory search-result URL.
///
/// Checks host, search page path, the directory webcode, and that *both*
/// `firstname` and `lastname` parameters are present and non-empty —
/// single-field searches return too many ambiguous results to verify
/// reliably.
pub fn validate_icf_url(raw: &str) -> Result<IcfNameParts, ValidationError> {
    let url = parse_url(raw)?;
    require_host(&url, ICF_DOMAIN)?;

    if !url.path().to_ascii_lowercase().contains(ICF_SEARCH_PATH) {
        return Err(ValidationError::WrongPage {
            path: url.path().to_string(),
            expected: ICF_SEARCH_PATH,
        });
    }

    let webcode = query_param(&url, "webcode");
    match webcode.as_deref() {
        Some(code) if code.eq_ignore_ascii_case(ICF_SEARCH_WEBCODE) => {}
        _ => return Err(ValidationError::WrongWebcode { found: webcode }),
    }

    let first = query_param(&url, "firstname");
    let last = query_param(&url, "lastname");

    match (nonempty(first), nonempty(last)) {
        (Some(first_name), Some(last_name)) => Ok(IcfNameParts {
            first_name,
            last_name,
        }),
        (None, None) => Err(ValidationError::MissingName),
        _ => Err(ValidationError::IncompleteName),
    }
}

/// Validate a bare EIA reference supplied directly instead of via a URL.
pub fn validate_eia_reference(raw: &str) -> Result<EiaReference, ValidationError> {
    EiaReference::new(raw)
}

/// Require that at least one token of the claimed full name matches the
/// URL's first name AND at least one token matches the last name, where
/// "matches" is a case-folded substring check in either direction.
///
/// Guards against a coach submitting someone else's search-result URL with
/// their own name typed into the form.
pub fn check_name_consistency(
    claimed_name: &str,
    parts: &IcfNameParts,
) -> Result<(), ValidationError> {
    let tokens: Vec<String> = claimed_name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();

    let first = parts.first_name.to_lowercase();
    let last = parts.last_name.to_lowercase();

    let matches = |token: &String, part: &String| -> bool {
        !token.is_empty() && !part.is_empty() && (token.contains(part.as_str()) || part.contains(token.as_str()))
    };

    let first_ok = tokens.iter().any(|token| matches(token, &first));
    let last_ok = tokens.iter().any(|token| matches(token, &last));

    if first_ok && last_ok {
        Ok(())
    } else {
        Err(ValidationError::NameUrlMismatch {
            url_name: parts.full(),
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, ValidationError> {
    Url::parse(raw.trim()).map_err(|_| ValidationError::MalformedUrl)
}

fn require_host(url: &Url, expected: &'static str) -> Result<(), ValidationError> {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    if host.contains(expected) {
        Ok(())
    } else {
        Err(ValidationError::InvalidDomain { host, expected })
    }
}

/// Case-insensitive query parameter lookup, percent-decoded.
fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.into_owned())
}

fn nonempty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMCC_OK: &str =
        "https://www.emccglobal.org/accreditation/eia/eia-awards/?reference=EIA20230480&search=1";

    #[test]
    fn emcc_url_valid_extracts_reference() {
        let reference = validate_emcc_url(EMCC_OK).expect("valid");
        assert_eq!(reference.as_str(), "EIA20230480");
    }

    #[test]
    fn emcc_url_lowercase_reference_is_normalized() {
        let url =
            "https://www.emccglobal.org/accreditation/eia/eia-awards/?reference=eia1&search=1";
        assert_eq!(validate_emcc_url(url).expect("valid").as_str(), "EIA1");
    }

    #[test]
    fn emcc_url_missing_reference() {
        let url =
            "https://www.emccglobal.org/accreditation/eia/eia-awards/?first_name=Jane&search=1";
        assert_eq!(
            validate_emcc_url(url).unwrap_err(),
            ValidationError::MissingReference
        );
    }

    #[test]
    fn emcc_url_wrong_domain() {
        let url = "https://example.com/?reference=EIA1&search=1";
        assert!(matches!(
            validate_emcc_url(url).unwrap_err(),
            ValidationError::InvalidDomain { .. }
        ));
    }

    #[test]
    fn emcc_url_not_a_search_result() {
        let url = "https://www.emccglobal.org/accreditation/eia/eia-awards/?reference=EIA1";
        assert_eq!(
            validate_emcc_url(url).unwrap_err(),
            ValidationError::NotASearchResult
        );
    }

    #[test]
    fn emcc_url_wrong_page() {
        let url = "https://www.emccglobal.org/about/?reference=EIA1&search=1";
        assert!(matches!(
            validate_emcc_url(url).unwrap_err(),
            ValidationError::WrongPage { .. }
        ));
    }

    #[test]
    fn emcc_url_malformed() {
        assert_eq!(
            validate_emcc_url("not a url").unwrap_err(),
            ValidationError::MalformedUrl
        );
    }

    #[test]
    fn emcc_url_bad_reference_format() {
        let url =
            "https://www.emccglobal.org/accreditation/eia/eia-awards/?reference=20230480&search=1";
        assert!(matches!(
            validate_emcc_url(url).unwrap_err(),
            ValidationError::BadReferenceFormat { .. }
        ));
    }

    fn icf_url(query: &str) -> String {
        format!(
            "https://apps.coachingfederation.org/eweb/CCFDynamicPage.aspx?webcode=ccfcoachsearch&{query}"
        )
    }

    #[test]
    fn icf_url_valid_extracts_both_names() {
        let parts = validate_icf_url(&icf_url("firstname=Jane&lastname=Doe")).expect("valid");
        assert_eq!(parts.first_name, "Jane");
        assert_eq!(parts.last_name, "Doe");
    }

    #[test]
    fn icf_url_single_name_field_is_incomplete() {
        assert_eq!(
            validate_icf_url(&icf_url("firstname=Jane")).unwrap_err(),
            ValidationError::IncompleteName
        );
        assert_eq!(
            validate_icf_url(&icf_url("firstname=Jane&lastname=")).unwrap_err(),
            ValidationError::IncompleteName
        );
    }

    #[test]
    fn icf_url_no_name_fields() {
        assert_eq!(
            validate_icf_url(&icf_url("city=London")).unwrap_err(),
            ValidationError::MissingName
        );
    }

    #[test]
    fn icf_url_wrong_webcode() {
        let url = "https://apps.coachingfederation.org/eweb/CCFDynamicPage.aspx?webcode=homepage&firstname=Jane&lastname=Doe";
        assert!(matches!(
            validate_icf_url(url).unwrap_err(),
            ValidationError::WrongWebcode { .. }
        ));
    }

    #[test]
    fn icf_url_wrong_domain() {
        let url = "https://example.org/eweb/CCFDynamicPage.aspx?webcode=ccfcoachsearch&firstname=J&lastname=D";
        assert!(matches!(
            validate_icf_url(url).unwrap_err(),
            ValidationError::InvalidDomain { .. }
        ));
    }

    #[test]
    fn name_consistency_accepts_matching_name() {
        let parts = IcfNameParts {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        };
        assert!(check_name_consistency("Jane Doe", &parts).is_ok());
        // Token containment works in both directions.
        assert!(check_name_consistency("Jan Doe", &parts).is_ok());
        assert!(check_name_consistency("Janet Doe-Smith", &parts).is_ok());
    }

    #[test]
    fn name_consistency_rejects_different_name() {
        let parts = IcfNameParts {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        };
        let err = check_name_consistency("Bob Smith", &parts).unwrap_err();
        assert!(matches!(err, ValidationError::NameUrlMismatch { .. }));
    }

    #[test]
    fn bare_reference_validator_matches_url_validator() {
        assert_eq!(
            validate_eia_reference(" eia20230480").expect("valid").as_str(),
            "EIA20230480"
        );
        assert!(validate_eia_reference("EIA-123").is_err());
    }
}
