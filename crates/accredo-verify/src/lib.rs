//! # accredo-verify — Verification Orchestration
//!
//! Top-level entry points for one verification attempt per accreditation
//! body: EMCC by reference, EMCC by URL, ICF by URL, ICF by name. Each
//! sequences cache lookup → identifier validation → directory fetch →
//! extraction → similarity scoring → duplicate-use check → cache write,
//! and maps every failure branch to a specific user-facing reason.
//!
//! ## Every path ends in a verdict
//!
//! Nothing escapes this crate as an error. Syntactic failures, name
//! mismatches, and confirmed duplicate claims are hard rejections; a
//! missing scraping credential or an unreachable directory downgrades to
//! pending manual review, because third-party availability must never block
//! onboarding. Storage failures are logged and degrade gracefully (a cache
//! read failure is a cache miss, a cache write failure leaves the verdict
//! standing).
//!
//! ## Composition
//!
//! [`CredentialVerifier`] owns three injected collaborators behind traits:
//! a [`DirectoryFetcher`] for the network hop, a
//! [`store::CredentialStore`] for the credential cache, and a
//! [`store::CoachRegistry`] for duplicate-claim checks and verdict
//! persistence. All are object-safe so deployments can select live or
//! in-memory implementations at runtime.

pub mod request;
pub mod store;

mod emcc;
mod icf;
mod outcome;

use accredo_core::similarity::{ICF_BLENDED_ACCEPT, ICF_CANDIDATE_FLOOR, NAME_ACCEPT_THRESHOLD};
use accredo_core::{
    name_similarity, AccreditationBody, CacheKey, CoachId, Verdict, VerifiedCredential,
};
use accredo_directory::DirectoryFetcher;

use crate::store::{CoachRegistry, CredentialStore};

pub use request::{EmccReferenceRequest, EmccUrlRequest, IcfNameRequest, IcfUrlRequest};

/// Load-bearing acceptance thresholds, injectable for tests.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Minimum name similarity for cache hits and live EMCC matches.
    pub name_accept: f64,
    /// Minimum name similarity for an ICF candidate to be considered.
    pub icf_candidate_floor: f64,
    /// Blended confidence an ICF candidate must clear to verify outright.
    pub icf_blended_accept: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            name_accept: NAME_ACCEPT_THRESHOLD,
            icf_candidate_floor: ICF_CANDIDATE_FLOOR,
            icf_blended_accept: ICF_BLENDED_ACCEPT,
        }
    }
}

/// Orchestrates verification attempts against the accreditation bodies.
pub struct CredentialVerifier {
    fetcher: Box<dyn DirectoryFetcher>,
    store: Box<dyn CredentialStore>,
    registry: Box<dyn CoachRegistry>,
    thresholds: Thresholds,
}

impl CredentialVerifier {
    /// Build a verifier with default thresholds.
    pub fn new(
        fetcher: Box<dyn DirectoryFetcher>,
        store: Box<dyn CredentialStore>,
        registry: Box<dyn CoachRegistry>,
    ) -> Self {
        Self::with_thresholds(fetcher, store, registry, Thresholds::default())
    }

    /// Build a verifier with explicit thresholds.
    pub fn with_thresholds(
        fetcher: Box<dyn DirectoryFetcher>,
        store: Box<dyn CredentialStore>,
        registry: Box<dyn CoachRegistry>,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            fetcher,
            store,
            registry,
            thresholds,
        }
    }

    /// Cache lookup keyed by identifier. A hit with sufficient name
    /// similarity short-circuits the whole live pipeline; a hit under a
    /// different name is a terminal mismatch. Read failures degrade to a
    /// miss.
    pub(crate) async fn cache_check(&self, key: &CacheKey, claimed_name: &str) -> CacheOutcome {
        let cached = match self.store.lookup_active(key).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "credential cache lookup failed, treating as miss");
                return CacheOutcome::Miss;
            }
        };
        let Some(record) = cached else {
            return CacheOutcome::Miss;
        };

        let score = name_similarity(claimed_name, &record.directory_name);
        if score >= self.thresholds.name_accept {
            tracing::info!(key = %key, "cache hit — skipping directory fetch");
            CacheOutcome::Hit(Verdict::verified(100, outcome::details_from_cached(&record)))
        } else {
            CacheOutcome::Mismatch(Verdict::rejected(format!(
                "this credential is already on record under the name {} — contact support if your name has changed",
                record.directory_name
            )))
        }
    }

    /// Reject a live success when the same credential is already verified
    /// on a different coach account. Registry failures log and proceed
    /// without the check — it is a heuristic guard, not a correctness gate.
    pub(crate) async fn duplicate_check(
        &self,
        coach_id: &CoachId,
        body: AccreditationBody,
        level: &str,
        directory_name: &str,
    ) -> Option<Verdict> {
        let surname = outcome::surname(directory_name);
        match self
            .registry
            .find_conflicting_claim(body, level, surname, coach_id)
            .await
        {
            Ok(Some(conflict)) => {
                tracing::info!(
                    coach_id = %coach_id,
                    conflicting_coach = %conflict.coach_id,
                    "credential already claimed by another coach"
                );
                Some(Verdict::rejected(format!(
                    "a {body} {level} credential under this name is already verified on another account — contact support if you believe this is an error"
                )))
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!(error = %e, "duplicate-claim check failed, proceeding without it");
                None
            }
        }
    }

    /// Persist side effects and return the verdict. Skipped entirely for
    /// provisional (`temp_`) coach accounts. Failures never change the
    /// verdict.
    pub(crate) async fn finalize(
        &self,
        coach_id: &CoachId,
        body: AccreditationBody,
        verdict: Verdict,
        cache_write: Option<VerifiedCredential>,
    ) -> Verdict {
        if coach_id.is_provisional() {
            return verdict;
        }
        if let Some(record) = cache_write {
            if let Err(e) = self.store.insert(record).await {
                tracing::warn!(coach_id = %coach_id, error = %e, "credential cache insert failed");
            }
        }
        if let Err(e) = self.registry.record_verdict(coach_id, body, &verdict).await {
            tracing::warn!(coach_id = %coach_id, error = %e, "failed to persist verdict to coach record");
        }
        verdict
    }

    pub(crate) fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub(crate) fn fetcher(&self) -> &dyn DirectoryFetcher {
        self.fetcher.as_ref()
    }
}

/// Result of the credential cache short-circuit.
pub(crate) enum CacheOutcome {
    /// Confirmed from cache; no network call needed.
    Hit(Verdict),
    /// Cached under a different name; terminal rejection.
    Mismatch(Verdict),
    /// Nothing cached; continue with the live pipeline.
    Miss,
}
