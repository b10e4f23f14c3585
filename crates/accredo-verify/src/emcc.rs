//! EMCC verification pipelines.
//!
//! EMCC awards carry a globally unique EIA reference number, so both entry
//! points resolve to "find the directory row for this reference, then check
//! the name on it". By-reference searches get one by-name fallback fetch
//! because the EMCC search form occasionally renders zero rows for a
//! reference that exists; by-URL submissions are fetched exactly as pasted.

use accredo_core::{
    confidence, name_similarity, validate_eia_reference, validate_emcc_url, AccreditationBody,
    CacheKey, CoachId, EiaReference, Provenance, Verdict,
};
use accredo_directory::client::{emcc_name_search_url, emcc_reference_search_url};
use accredo_directory::extract::emcc as emcc_extract;
use accredo_directory::Candidate;

use crate::outcome;
use crate::request::{EmccReferenceRequest, EmccUrlRequest};
use crate::{CacheOutcome, CredentialVerifier};

impl CredentialVerifier {
    /// Verify an EMCC award from a bare EIA reference number.
    pub async fn verify_emcc_by_reference(&self, request: &EmccReferenceRequest) -> Verdict {
        let reference = match validate_eia_reference(&request.eia_number) {
            Ok(reference) => reference,
            Err(e) => return Verdict::rejected(e.to_string()),
        };
        self.run_emcc(
            &request.coach_id,
            &request.full_name,
            reference,
            None,
            Provenance::Auto,
        )
        .await
    }

    /// Verify an EMCC award from a pasted directory search-result URL.
    pub async fn verify_emcc_by_url(&self, request: &EmccUrlRequest) -> Verdict {
        let reference = match validate_emcc_url(&request.profile_url) {
            Ok(reference) => reference,
            Err(e) => return Verdict::rejected(e.to_string()),
        };
        self.run_emcc(
            &request.coach_id,
            &request.full_name,
            reference,
            Some(request.profile_url.trim().to_string()),
            Provenance::Url,
        )
        .await
    }

    /// Shared EMCC pipeline past syntactic validation. `submitted_url` is
    /// the pasted URL to fetch, when one was supplied; otherwise the search
    /// URL is built from the reference, with one by-name fallback fetch.
    async fn run_emcc(
        &self,
        coach_id: &CoachId,
        full_name: &str,
        reference: EiaReference,
        submitted_url: Option<String>,
        provenance: Provenance,
    ) -> Verdict {
        let key = CacheKey::emcc(reference.clone());

        match self.cache_check(&key, full_name).await {
            CacheOutcome::Hit(verdict) => {
                return self
                    .finalize(coach_id, AccreditationBody::Emcc, verdict, None)
                    .await;
            }
            CacheOutcome::Mismatch(verdict) => {
                return self
                    .finalize(coach_id, AccreditationBody::Emcc, verdict, None)
                    .await;
            }
            CacheOutcome::Miss => {}
        }

        let candidate = match self
            .fetch_emcc_candidate(full_name, &reference, submitted_url.as_deref())
            .await
        {
            Ok(candidate) => candidate,
            Err(verdict) => {
                return self
                    .finalize(coach_id, AccreditationBody::Emcc, verdict, None)
                    .await;
            }
        };

        let Some(candidate) = candidate else {
            let verdict = Verdict::rejected(format!(
                "no EMCC award was found for reference {reference} — check the number on your award certificate"
            ));
            return self
                .finalize(coach_id, AccreditationBody::Emcc, verdict, None)
                .await;
        };

        let score = name_similarity(full_name, &candidate.name);
        if score < self.thresholds().name_accept {
            let verdict = Verdict::rejected_with_confidence(
                confidence(score),
                format!(
                    "the EMCC award {reference} is registered to {} — submit the reference issued under your own name",
                    candidate.name
                ),
            );
            return self
                .finalize(coach_id, AccreditationBody::Emcc, verdict, None)
                .await;
        }

        let level = candidate.level.clone().unwrap_or_default();
        if let Some(verdict) = self
            .duplicate_check(coach_id, AccreditationBody::Emcc, &level, &candidate.name)
            .await
        {
            return self
                .finalize(coach_id, AccreditationBody::Emcc, verdict, None)
                .await;
        }

        let record = outcome::credential_from_candidate(key, &candidate, provenance);
        let verdict = Verdict::verified(confidence(score), outcome::details_from_candidate(&candidate));
        self.finalize(coach_id, AccreditationBody::Emcc, verdict, Some(record))
            .await
    }

    /// Fetch and extract the directory row for `reference`. A by-reference
    /// search that renders no rows is retried once as a by-name search; a
    /// pasted URL is fetched exactly once. Fetch failures come back as
    /// ready-made pending-review verdicts.
    async fn fetch_emcc_candidate(
        &self,
        full_name: &str,
        reference: &EiaReference,
        submitted_url: Option<&str>,
    ) -> Result<Option<Candidate>, Verdict> {
        let first_url = match submitted_url {
            Some(url) => url.to_string(),
            None => emcc_reference_search_url(reference),
        };

        let html = self
            .fetcher()
            .fetch_page(&first_url)
            .await
            .map_err(|e| outcome::pending_from_directory(AccreditationBody::Emcc, &e))?;

        if let Some(candidate) = emcc_extract::extract(&html, reference).into_iter().next() {
            return Ok(Some(candidate));
        }

        if submitted_url.is_some() {
            return Ok(None);
        }

        tracing::debug!(reference = %reference, "by-reference search rendered no rows, retrying by name");
        let fallback_html = self
            .fetcher()
            .fetch_page(&emcc_name_search_url(full_name))
            .await
            .map_err(|e| outcome::pending_from_directory(AccreditationBody::Emcc, &e))?;

        Ok(emcc_extract::extract(&fallback_html, reference)
            .into_iter()
            .next())
    }
}
