//! # Credential Cache Data Model and Verdicts
//!
//! A [`VerifiedCredential`] is the persisted record of a confirmed
//! identity↔credential binding; it is what lets a repeat verification
//! request skip the external fetch/scrape entirely. Records are
//! append-mostly: new successful verifications insert, nothing updates, and
//! lookups must filter to active rows.
//!
//! The cache key is a sum type rather than an ad-hoc concatenated string:
//! EMCC keys on the reference number alone (EMCC's numbering is globally
//! unique), while ICF — which issues no public reference number — keys on
//! normalized name + location, the deduplicating signal this system itself
//! introduced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::body::AccreditationBody;
use crate::identity::EiaReference;

/// Lookup key for the credential cache, tagged by accreditation body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheKey {
    /// EMCC: the normalized EIA reference on its own.
    Emcc {
        reference: EiaReference,
    },
    /// ICF: normalized-uppercase full name plus normalized-uppercase
    /// location string.
    Icf {
        name: String,
        location: String,
    },
}

impl CacheKey {
    /// Key for an EMCC credential.
    pub fn emcc(reference: EiaReference) -> Self {
        Self::Emcc { reference }
    }

    /// Key for an ICF credential. Name and location are uppercased with
    /// whitespace runs collapsed so that cosmetic differences between
    /// submissions land on the same key.
    pub fn icf(name: &str, location: &str) -> Self {
        Self::Icf {
            name: normalize_key_part(name),
            location: normalize_key_part(location),
        }
    }

    /// The accreditation body this key belongs to.
    pub fn body(&self) -> AccreditationBody {
        match self {
            Self::Emcc { .. } => AccreditationBody::Emcc,
            Self::Icf { .. } => AccreditationBody::Icf,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Emcc { reference } => write!(f, "EMCC:{reference}"),
            Self::Icf { name, location } => write!(f, "ICF:{name}|{location}"),
        }
    }
}

fn normalize_key_part(raw: &str) -> String {
    raw.split_whitespace()
        .map(|token| token.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// How a cached credential was originally confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Confirmed by an automated directory search this system performed.
    Auto,
    /// Confirmed from a search-result URL the coach supplied.
    Url,
    /// Confirmed by a human reviewer.
    Manual,
}

impl Provenance {
    /// Lowercase storage token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Url => "url",
            Self::Manual => "manual",
        }
    }
}

/// A persisted, previously confirmed identity↔credential binding.
///
/// Created the first time a key is successfully verified; never mutated
/// afterwards except for deactivation (handled outside the verification
/// core). At most one *active* record per key is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedCredential {
    /// Record identifier.
    pub id: Uuid,
    /// Cache key (tagged by body).
    pub key: CacheKey,
    /// Full name exactly as found on the directory.
    pub directory_name: String,
    /// Accreditation level as found, if the extractor attached one.
    pub level: Option<String>,
    /// Country or location string as found / as supplied.
    pub location: Option<String>,
    /// Directory profile URL, when one was available.
    pub profile_url: Option<String>,
    /// Whether this record is still authoritative.
    pub is_active: bool,
    /// How this record was confirmed.
    pub provenance: Provenance,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl VerifiedCredential {
    /// Build a fresh active record for a just-confirmed credential.
    pub fn confirmed(
        key: CacheKey,
        directory_name: impl Into<String>,
        provenance: Provenance,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            key,
            directory_name: directory_name.into(),
            level: None,
            location: None,
            profile_url: None,
            is_active: true,
            provenance,
            created_at: Utc::now(),
        }
    }

    /// The accreditation body, derived from the key.
    pub fn body(&self) -> AccreditationBody {
        self.key.body()
    }
}

/// The identity attributes actually found on the directory for a verified
/// match, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub name: String,
    pub level: Option<String>,
    pub country: Option<String>,
    pub profile_url: Option<String>,
}

/// Terminal, immutable outcome of one verification attempt.
///
/// Invariants, enforced by the constructors:
/// `verified == true` implies `match_details` is present;
/// `pending_manual_review == true` implies `verified == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the claimed credential was confirmed.
    pub verified: bool,
    /// Confidence in the outcome, 0–100.
    pub confidence: u8,
    /// Attributes found on the directory, present iff verified.
    pub match_details: Option<MatchDetails>,
    /// Specific, user-actionable reason for a non-verified outcome.
    pub reason: Option<String>,
    /// Automated verification could not complete; a human will finish the
    /// check and the coach may proceed with onboarding meanwhile.
    pub pending_manual_review: bool,
}

impl Verdict {
    /// A confirmed verification.
    pub fn verified(confidence: u8, details: MatchDetails) -> Self {
        Self {
            verified: true,
            confidence,
            match_details: Some(details),
            reason: None,
            pending_manual_review: false,
        }
    }

    /// A hard rejection with a user-actionable reason. Never retried.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            verified: false,
            confidence: 0,
            match_details: None,
            reason: Some(reason.into()),
            pending_manual_review: false,
        }
    }

    /// A rejection that still reports how close the best candidate came.
    pub fn rejected_with_confidence(confidence: u8, reason: impl Into<String>) -> Self {
        Self {
            confidence,
            ..Self::rejected(reason)
        }
    }

    /// Automated verification could not complete; defer to a human.
    pub fn pending_review(reason: impl Into<String>) -> Self {
        Self {
            verified: false,
            confidence: 0,
            match_details: None,
            reason: Some(reason.into()),
            pending_manual_review: true,
        }
    }

    /// Pending review, reporting the confidence of an ambiguous best match.
    pub fn pending_review_with_confidence(confidence: u8, reason: impl Into<String>) -> Self {
        Self {
            confidence,
            ..Self::pending_review(reason)
        }
    }

    /// Storage token for the coach profile: `verified`, `pending_review`,
    /// or `rejected`.
    pub fn status_str(&self) -> &'static str {
        if self.verified {
            "verified"
        } else if self.pending_manual_review {
            "pending_review"
        } else {
            "rejected"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icf_key_normalizes_name_and_location() {
        let a = CacheKey::icf("Jane  Doe", "london,  uk");
        let b = CacheKey::icf("  jane doe ", "LONDON, UK");
        assert_eq!(a, b);
    }

    #[test]
    fn emcc_and_icf_keys_never_collide() {
        let reference = EiaReference::new("EIA1").expect("valid");
        let emcc = CacheKey::emcc(reference);
        let icf = CacheKey::icf("EIA1", "");
        assert_ne!(emcc, icf);
        assert_eq!(emcc.body(), AccreditationBody::Emcc);
        assert_eq!(icf.body(), AccreditationBody::Icf);
    }

    #[test]
    fn confirmed_credential_is_active() {
        let key = CacheKey::icf("Jane Doe", "London, UK");
        let record = VerifiedCredential::confirmed(key, "Jane Doe", Provenance::Url);
        assert!(record.is_active);
        assert_eq!(record.body(), AccreditationBody::Icf);
        assert_eq!(record.provenance, Provenance::Url);
    }

    #[test]
    fn verdict_invariants() {
        let verified = Verdict::verified(
            100,
            MatchDetails {
                name: "Jane Doe".into(),
                level: None,
                country: None,
                profile_url: None,
            },
        );
        assert!(verified.verified && verified.match_details.is_some());
        assert!(!verified.pending_manual_review);
        assert_eq!(verified.status_str(), "verified");

        let rejected = Verdict::rejected("no match");
        assert!(!rejected.verified && !rejected.pending_manual_review);
        assert_eq!(rejected.status_str(), "rejected");

        let pending = Verdict::pending_review("directory unreachable");
        assert!(!pending.verified && pending.pending_manual_review);
        assert_eq!(pending.status_str(), "pending_review");
    }

    #[test]
    fn verdict_serde_round_trip() {
        let verdict = Verdict::rejected_with_confidence(62, "similarity too low");
        let json = serde_json::to_string(&verdict).expect("serialize");
        let back: Verdict = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, verdict);
    }
}
