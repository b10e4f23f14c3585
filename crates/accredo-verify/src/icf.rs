//! ICF verification pipelines.
//!
//! ICF issues no public reference number, so verification is a fuzzy
//! name-directed search: every extracted candidate above the similarity
//! floor is scored on a blend of name, location, and credential level, and
//! the best blend decides between verified, pending manual review, and
//! rejected. The middle band exists because a near-miss on a name-only
//! match is far more often a transliteration or marriage-name issue than
//! fraud.

use accredo_core::{
    check_name_consistency, confidence, name_similarity, validate_icf_url, AccreditationBody,
    CacheKey, CoachId, IcfLevel, Provenance, Verdict,
};
use accredo_directory::client::{icf_name_search_url, split_name};
use accredo_directory::extract::icf as icf_extract;
use accredo_directory::Candidate;

use crate::outcome;
use crate::request::{IcfNameRequest, IcfUrlRequest};
use crate::{CacheOutcome, CredentialVerifier};

/// Blend weights with a location supplied: name dominates, location and
/// level confirm.
const WEIGHTS_WITH_LOCATION: BlendWeights = BlendWeights {
    name: 0.70,
    location: 0.20,
    level: 0.10,
};

/// Blend weights without a location: its share moves onto the name.
const WEIGHTS_NAME_ONLY: BlendWeights = BlendWeights {
    name: 0.90,
    location: 0.0,
    level: 0.10,
};

#[derive(Debug, Clone, Copy)]
struct BlendWeights {
    name: f64,
    location: f64,
    level: f64,
}

/// A candidate with its component and blended scores attached.
struct Scored {
    candidate: Candidate,
    blended: f64,
}

impl CredentialVerifier {
    /// Verify an ICF credential from a pasted directory search-result URL.
    pub async fn verify_icf_by_url(&self, request: &IcfUrlRequest) -> Verdict {
        let parts = match validate_icf_url(&request.profile_url) {
            Ok(parts) => parts,
            Err(e) => return Verdict::rejected(e.to_string()),
        };
        if let Err(e) = check_name_consistency(&request.full_name, &parts) {
            return Verdict::rejected(e.to_string());
        }

        self.run_icf(
            &request.coach_id,
            &request.full_name,
            request.claimed_level,
            Some(request.location.as_str()),
            request.profile_url.trim().to_string(),
            Provenance::Url,
        )
        .await
    }

    /// Verify an ICF credential from the claimed name alone; the search URL
    /// is built server-side.
    pub async fn verify_icf_by_name(&self, request: &IcfNameRequest) -> Verdict {
        let (first, last) = split_name(&request.full_name);
        if first.is_empty() {
            return Verdict::rejected(
                "a full name is required to search the ICF directory".to_string(),
            );
        }
        let search_url = icf_name_search_url(first, last);

        self.run_icf(
            &request.coach_id,
            &request.full_name,
            request.claimed_level,
            request.location.as_deref(),
            search_url,
            Provenance::Auto,
        )
        .await
    }

    /// Shared ICF pipeline past syntactic validation.
    async fn run_icf(
        &self,
        coach_id: &CoachId,
        full_name: &str,
        claimed_level: IcfLevel,
        location: Option<&str>,
        fetch_url: String,
        provenance: Provenance,
    ) -> Verdict {
        let key = CacheKey::icf(full_name, location.unwrap_or_default());

        match self.cache_check(&key, full_name).await {
            CacheOutcome::Hit(verdict) | CacheOutcome::Mismatch(verdict) => {
                return self
                    .finalize(coach_id, AccreditationBody::Icf, verdict, None)
                    .await;
            }
            CacheOutcome::Miss => {}
        }

        let html = match self.fetcher().fetch_page(&fetch_url).await {
            Ok(html) => html,
            Err(e) => {
                let verdict = outcome::pending_from_directory(AccreditationBody::Icf, &e);
                return self
                    .finalize(coach_id, AccreditationBody::Icf, verdict, None)
                    .await;
            }
        };

        let candidates = icf_extract::extract(&html, full_name, location);
        let verdict = self
            .score_icf(coach_id, full_name, claimed_level, location, candidates)
            .await;

        let cache_write = verdict
            .verified
            .then(|| verdict.match_details.as_ref())
            .flatten()
            .map(|details| {
                let candidate = Candidate {
                    name: details.name.clone(),
                    level: details.level.clone(),
                    country: details.country.clone(),
                    profile_url: details.profile_url.clone(),
                };
                outcome::credential_from_candidate(key.clone(), &candidate, provenance)
            });

        self.finalize(coach_id, AccreditationBody::Icf, verdict, cache_write)
            .await
    }

    /// Score extracted candidates and pick the verdict band. Returns a
    /// plain rejection when nothing clears the similarity floor, pending
    /// review when the best blend lands between floor and accept, and runs
    /// the duplicate-claim check before confirming an accept.
    async fn score_icf(
        &self,
        coach_id: &CoachId,
        full_name: &str,
        claimed_level: IcfLevel,
        location: Option<&str>,
        candidates: Vec<Candidate>,
    ) -> Verdict {
        let thresholds = self.thresholds();
        let weights = if location.is_some() {
            WEIGHTS_WITH_LOCATION
        } else {
            WEIGHTS_NAME_ONLY
        };

        let mut best: Option<Scored> = None;
        let mut best_name_score: f64 = 0.0;
        for candidate in candidates {
            let name_score = name_similarity(full_name, &candidate.name);
            best_name_score = best_name_score.max(name_score);
            if name_score < thresholds.icf_candidate_floor {
                continue;
            }
            let blended = blend(&candidate, name_score, claimed_level, weights);
            if best.as_ref().map_or(true, |b| blended > b.blended) {
                best = Some(Scored { candidate, blended });
            }
        }

        let Some(best) = best else {
            return if best_name_score > 0.0 {
                Verdict::rejected_with_confidence(
                    confidence(best_name_score),
                    format!(
                        "no ICF directory entry closely matches the name {full_name} — check the spelling against your ICF account"
                    ),
                )
            } else {
                Verdict::rejected(format!(
                    "no ICF credential was found for {full_name} — check that your credential is published in the ICF directory"
                ))
            };
        };

        if best.blended < thresholds.icf_blended_accept {
            return Verdict::pending_review_with_confidence(
                confidence(best.blended),
                format!(
                    "the closest ICF directory match ({}) is not conclusive — your credential will be reviewed manually",
                    best.candidate.name
                ),
            );
        }

        let level = best.candidate.level.clone().unwrap_or_default();
        if let Some(verdict) = self
            .duplicate_check(coach_id, AccreditationBody::Icf, &level, &best.candidate.name)
            .await
        {
            return verdict;
        }

        Verdict::verified(
            confidence(best.blended),
            outcome::details_from_candidate(&best.candidate),
        )
    }
}

/// Weighted blend of the three match signals. Location scores when the
/// extractor found the expected location near the candidate; level scores
/// when the directory shows the claimed credential.
fn blend(
    candidate: &Candidate,
    name_score: f64,
    claimed_level: IcfLevel,
    weights: BlendWeights,
) -> f64 {
    let location_score = if candidate.country.is_some() { 1.0 } else { 0.0 };
    let level_score = match &candidate.level {
        Some(level) if level.eq_ignore_ascii_case(claimed_level.as_str()) => 1.0,
        _ => 0.0,
    };
    weights.name * name_score + weights.location * location_score + weights.level * level_score
}
