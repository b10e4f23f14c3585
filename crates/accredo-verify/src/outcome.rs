//! Verdict assembly helpers shared by the per-body pipelines.

use accredo_core::{
    AccreditationBody, CacheKey, MatchDetails, Provenance, Verdict, VerifiedCredential,
};
use accredo_directory::{Candidate, DirectoryError};

/// Echo a cached record back as match details.
pub(crate) fn details_from_cached(record: &VerifiedCredential) -> MatchDetails {
    MatchDetails {
        name: record.directory_name.clone(),
        level: record.level.clone(),
        country: record.location.clone(),
        profile_url: record.profile_url.clone(),
    }
}

/// Echo a live directory candidate back as match details.
pub(crate) fn details_from_candidate(candidate: &Candidate) -> MatchDetails {
    MatchDetails {
        name: candidate.name.clone(),
        level: candidate.level.clone(),
        country: candidate.country.clone(),
        profile_url: candidate.profile_url.clone(),
    }
}

/// Build the cache record for a just-confirmed live match.
pub(crate) fn credential_from_candidate(
    key: CacheKey,
    candidate: &Candidate,
    provenance: Provenance,
) -> VerifiedCredential {
    let mut record = VerifiedCredential::confirmed(key, candidate.name.clone(), provenance);
    record.level = candidate.level.clone();
    record.location = candidate.country.clone();
    record.profile_url = candidate.profile_url.clone();
    record
}

/// Final whitespace token of a name, used for duplicate-claim queries.
pub(crate) fn surname(full_name: &str) -> &str {
    full_name.split_whitespace().last().unwrap_or(full_name)
}

/// Map a directory fetch failure to a pending-review verdict. Availability
/// problems on the third party's side must never hard-reject a coach.
pub(crate) fn pending_from_directory(body: AccreditationBody, error: &DirectoryError) -> Verdict {
    let reason = match error {
        DirectoryError::ScrapingUnavailable { .. } => format!(
            "automated {body} verification is temporarily unavailable — your credential will be reviewed manually"
        ),
        DirectoryError::Timeout { .. } => format!(
            "the {body} directory did not respond in time — your credential will be reviewed manually"
        ),
        DirectoryError::Unreachable { .. } => format!(
            "the {body} directory could not be reached — your credential will be reviewed manually"
        ),
    };
    tracing::warn!(body = %body, error = %error, "directory fetch failed, deferring to manual review");
    Verdict::pending_review(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surname_takes_last_token() {
        assert_eq!(surname("Carole Anne Adams"), "Adams");
        assert_eq!(surname("Cher"), "Cher");
        assert_eq!(surname(""), "");
    }

    #[test]
    fn directory_failures_become_pending_review() {
        let errors = [
            DirectoryError::ScrapingUnavailable {
                reason: "no credential".into(),
            },
            DirectoryError::Timeout { elapsed_ms: 30_000 },
            DirectoryError::Unreachable {
                reason: "connection refused".into(),
            },
        ];
        for error in errors {
            let verdict = pending_from_directory(AccreditationBody::Emcc, &error);
            assert!(!verdict.verified);
            assert!(verdict.pending_manual_review);
            assert!(verdict.reason.as_deref().unwrap().contains("manually"));
        }
    }
}
