//! # accredo-core — Foundational Types for the Accredo Verification Stack
//!
//! Pure domain logic for third-party coach accreditation verification.
//! Nothing in this crate performs I/O; every function here is deterministic
//! and synchronous so that accept/reject decisions are reproducible in tests.
//!
//! ## Modules
//!
//! - [`body`] — accreditation bodies (EMCC, ICF, AC) and their award/credential
//!   level vocabularies.
//! - [`identity`] — validated domain-primitive newtypes ([`EiaReference`],
//!   [`CoachId`]).
//! - [`similarity`] — normalized Levenshtein name similarity and the
//!   load-bearing acceptance thresholds.
//! - [`validate`] — per-body syntactic checks for directory URLs and
//!   reference numbers, plus the claimed-name vs URL-name consistency guard.
//! - [`credential`] — the credential cache data model ([`CacheKey`],
//!   [`VerifiedCredential`]) and the terminal [`Verdict`] value.
//! - [`error`] — the [`ValidationError`] taxonomy. Every variant corresponds
//!   to a distinct user-correctable failure; orchestrators surface the
//!   rendered message verbatim.

pub mod body;
pub mod credential;
pub mod error;
pub mod identity;
pub mod similarity;
pub mod validate;

pub use body::{AccreditationBody, EmccLevel, IcfLevel};
pub use credential::{CacheKey, MatchDetails, Provenance, Verdict, VerifiedCredential};
pub use error::ValidationError;
pub use identity::{CoachId, EiaReference};
pub use similarity::{confidence, name_similarity, similarity};
pub use validate::{
    check_name_consistency, validate_eia_reference, validate_emcc_url, validate_icf_url,
    IcfNameParts,
};
