//! Persistence seams for the verification pipeline.
//!
//! Two traits: [`CredentialStore`] is the credential cache keyed by
//! directory identifier, [`CoachRegistry`] answers duplicate-claim queries
//! and records verdicts on coach profiles. Both ship with in-memory
//! implementations for tests and keyless deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use accredo_core::{AccreditationBody, CacheKey, CoachId, Verdict, VerifiedCredential};

/// Storage backend failure. Callers treat these as soft: reads degrade to
/// misses, writes are logged and dropped.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {reason}")]
    Backend { reason: String },
}

/// Cache of previously verified credentials, keyed by directory identifier.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up an active credential for the given key.
    async fn lookup_active(&self, key: &CacheKey) -> Result<Option<VerifiedCredential>, StoreError>;

    /// Record a freshly verified credential.
    async fn insert(&self, credential: VerifiedCredential) -> Result<(), StoreError>;
}

/// A verified credential already claimed by some other coach.
#[derive(Debug, Clone)]
pub struct ConflictingClaim {
    pub coach_id: CoachId,
    pub directory_name: String,
}

/// Coach-profile side of persistence: duplicate-use queries and verdict
/// bookkeeping.
#[async_trait]
pub trait CoachRegistry: Send + Sync {
    /// Find a coach other than `exclude` who already holds a verified
    /// credential from `body` at `level` whose directory name contains
    /// `surname` (case-insensitive).
    async fn find_conflicting_claim(
        &self,
        body: AccreditationBody,
        level: &str,
        surname: &str,
        exclude: &CoachId,
    ) -> Result<Option<ConflictingClaim>, StoreError>;

    /// Persist the outcome of a verification attempt on the coach record.
    async fn record_verdict(
        &self,
        coach_id: &CoachId,
        body: AccreditationBody,
        verdict: &Verdict,
    ) -> Result<(), StoreError>;
}

// Forwarding impls so callers can keep a handle to a store they hand the
// verifier (`Box<dyn CredentialStore>` accepts an `Arc<InMemory…>`).
#[async_trait]
impl<T: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<T> {
    async fn lookup_active(
        &self,
        key: &CacheKey,
    ) -> Result<Option<VerifiedCredential>, StoreError> {
        (**self).lookup_active(key).await
    }

    async fn insert(&self, credential: VerifiedCredential) -> Result<(), StoreError> {
        (**self).insert(credential).await
    }
}

#[async_trait]
impl<T: CoachRegistry + ?Sized> CoachRegistry for std::sync::Arc<T> {
    async fn find_conflicting_claim(
        &self,
        body: AccreditationBody,
        level: &str,
        surname: &str,
        exclude: &CoachId,
    ) -> Result<Option<ConflictingClaim>, StoreError> {
        (**self)
            .find_conflicting_claim(body, level, surname, exclude)
            .await
    }

    async fn record_verdict(
        &self,
        coach_id: &CoachId,
        body: AccreditationBody,
        verdict: &Verdict,
    ) -> Result<(), StoreError> {
        (**self).record_verdict(coach_id, body, verdict).await
    }
}

/// HashMap-backed credential cache.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, VerifiedCredential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a record, for tests and seed data.
    pub fn seed(&self, credential: VerifiedCredential) {
        self.records
            .write()
            .expect("credential store lock poisoned")
            .insert(credential.key.to_string(), credential);
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn lookup_active(
        &self,
        key: &CacheKey,
    ) -> Result<Option<VerifiedCredential>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Backend {
                reason: "credential store lock poisoned".into(),
            })?;
        Ok(records
            .get(&key.to_string())
            .filter(|c| c.is_active)
            .cloned())
    }

    async fn insert(&self, credential: VerifiedCredential) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Backend {
            reason: "credential store lock poisoned".into(),
        })?;
        records.insert(credential.key.to_string(), credential);
        Ok(())
    }
}

/// One verified claim held in the in-memory registry.
#[derive(Debug, Clone)]
struct RegisteredClaim {
    coach_id: CoachId,
    body: AccreditationBody,
    level: String,
    directory_name: String,
}

/// In-memory coach registry; records verdicts and answers duplicate-claim
/// queries over claims seeded or recorded during the process lifetime.
#[derive(Default)]
pub struct InMemoryCoachRegistry {
    claims: RwLock<Vec<RegisteredClaim>>,
    verdicts: RwLock<Vec<(CoachId, AccreditationBody, String)>>,
}

impl InMemoryCoachRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing verified claim, for tests.
    pub fn seed_claim(
        &self,
        coach_id: CoachId,
        body: AccreditationBody,
        level: &str,
        directory_name: &str,
    ) {
        self.claims
            .write()
            .expect("coach registry lock poisoned")
            .push(RegisteredClaim {
                coach_id,
                body,
                level: level.to_string(),
                directory_name: directory_name.to_string(),
            });
    }

    /// Verdict statuses recorded for a coach, oldest first.
    pub fn recorded_statuses(&self, coach_id: &CoachId) -> Vec<String> {
        self.verdicts
            .read()
            .expect("coach registry lock poisoned")
            .iter()
            .filter(|(id, _, _)| id == coach_id)
            .map(|(_, _, status)| status.clone())
            .collect()
    }
}

#[async_trait]
impl CoachRegistry for InMemoryCoachRegistry {
    async fn find_conflicting_claim(
        &self,
        body: AccreditationBody,
        level: &str,
        surname: &str,
        exclude: &CoachId,
    ) -> Result<Option<ConflictingClaim>, StoreError> {
        let claims = self.claims.read().map_err(|_| StoreError::Backend {
            reason: "coach registry lock poisoned".into(),
        })?;
        let surname = surname.to_lowercase();
        Ok(claims
            .iter()
            .find(|claim| {
                claim.coach_id != *exclude
                    && claim.body == body
                    && claim.level.eq_ignore_ascii_case(level)
                    && claim.directory_name.to_lowercase().contains(&surname)
            })
            .map(|claim| ConflictingClaim {
                coach_id: claim.coach_id.clone(),
                directory_name: claim.directory_name.clone(),
            }))
    }

    async fn record_verdict(
        &self,
        coach_id: &CoachId,
        body: AccreditationBody,
        verdict: &Verdict,
    ) -> Result<(), StoreError> {
        let mut verdicts = self.verdicts.write().map_err(|_| StoreError::Backend {
            reason: "coach registry lock poisoned".into(),
        })?;
        verdicts.push((coach_id.clone(), body, verdict.status_str().to_string()));
        // A verified verdict also becomes a claim for future duplicate checks.
        if verdict.verified {
            if let Some(details) = &verdict.match_details {
                let mut claims = self.claims.write().map_err(|_| StoreError::Backend {
                    reason: "coach registry lock poisoned".into(),
                })?;
                claims.push(RegisteredClaim {
                    coach_id: coach_id.clone(),
                    body,
                    level: details.level.clone().unwrap_or_default(),
                    directory_name: details.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accredo_core::{EiaReference, Provenance};

    fn sample_credential() -> VerifiedCredential {
        let reference = EiaReference::new("EIA20230480").unwrap();
        let mut credential =
            VerifiedCredential::confirmed(CacheKey::emcc(reference), "Jane Doe", Provenance::Auto);
        credential.level = Some("Senior Practitioner".into());
        credential.location = Some("United Kingdom".into());
        credential
    }

    #[tokio::test]
    async fn lookup_misses_on_empty_store() {
        let store = InMemoryCredentialStore::new();
        let reference = EiaReference::new("EIA20230480").unwrap();
        let found = store.lookup_active(&CacheKey::emcc(reference)).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn insert_then_lookup_round_trips() {
        let store = InMemoryCredentialStore::new();
        store.insert(sample_credential()).await.unwrap();
        let reference = EiaReference::new("eia20230480").unwrap();
        let found = store.lookup_active(&CacheKey::emcc(reference)).await.unwrap();
        assert_eq!(found.unwrap().directory_name, "Jane Doe");
    }

    #[tokio::test]
    async fn inactive_records_are_not_returned() {
        let store = InMemoryCredentialStore::new();
        let mut credential = sample_credential();
        credential.is_active = false;
        store.insert(credential).await.unwrap();
        let reference = EiaReference::new("EIA20230480").unwrap();
        let found = store.lookup_active(&CacheKey::emcc(reference)).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn conflicting_claim_excludes_the_requesting_coach() {
        let registry = InMemoryCoachRegistry::new();
        let owner = CoachId::new("coach-1");
        registry.seed_claim(
            owner.clone(),
            AccreditationBody::Emcc,
            "Senior Practitioner",
            "Jane Doe",
        );

        let same = registry
            .find_conflicting_claim(
                AccreditationBody::Emcc,
                "Senior Practitioner",
                "doe",
                &owner,
            )
            .await
            .unwrap();
        assert!(same.is_none());

        let other = CoachId::new("coach-2");
        let conflict = registry
            .find_conflicting_claim(
                AccreditationBody::Emcc,
                "Senior Practitioner",
                "doe",
                &other,
            )
            .await
            .unwrap();
        assert_eq!(conflict.unwrap().directory_name, "Jane Doe");
    }

    #[tokio::test]
    async fn verified_verdicts_become_claims() {
        let registry = InMemoryCoachRegistry::new();
        let coach = CoachId::new("coach-9");
        let verdict = Verdict::verified(
            96,
            accredo_core::MatchDetails {
                name: "Ada Lovelace".into(),
                level: Some("PCC".into()),
                country: None,
                profile_url: None,
            },
        );
        registry
            .record_verdict(&coach, AccreditationBody::Icf, &verdict)
            .await
            .unwrap();

        let other = CoachId::new("coach-10");
        let conflict = registry
            .find_conflicting_claim(AccreditationBody::Icf, "PCC", "lovelace", &other)
            .await
            .unwrap();
        assert!(conflict.is_some());
        assert_eq!(registry.recorded_statuses(&coach), vec!["verified"]);
    }
}
