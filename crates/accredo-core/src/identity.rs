//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the identifiers flowing through a
//! verification attempt. String identifiers validate their format at
//! construction time — an [`EiaReference`] in hand is always well-formed
//! and normalized, so downstream code never re-checks it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// `EIA` followed by one or more digits, case-insensitive.
static EIA_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^EIA\d+$").expect("EIA format regex is valid"));

/// An EMCC EIA award reference number, normalized to uppercase with
/// surrounding whitespace stripped. Globally unique per EMCC's own numbering,
/// which makes it the EMCC credential cache key on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EiaReference(String);

impl EiaReference {
    /// Validate and normalize a raw reference string.
    ///
    /// Accepts any casing and surrounding whitespace; rejects anything that
    /// is not `EIA` followed by digits.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();
        if !EIA_FORMAT.is_match(trimmed) {
            return Err(ValidationError::BadReferenceFormat {
                value: trimmed.to_string(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The normalized reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EiaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Deserializes as a plain string, then routes through `new()` so invalid
// references are rejected at deserialization time.
impl<'de> Deserialize<'de> for EiaReference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// A coach account identifier supplied by the surrounding application.
///
/// The `temp_` prefix is a sentinel for a provisional account created during
/// onboarding: verification runs normally, but no persistence side effects
/// (verdict write, cache insert) are performed for provisional coaches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoachId(String);

impl CoachId {
    /// Sentinel prefix marking a not-yet-persisted coach account.
    pub const PROVISIONAL_PREFIX: &'static str = "temp_";

    /// Wrap a raw coach identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Whether this coach account is provisional and must not be persisted
    /// against.
    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(Self::PROVISIONAL_PREFIX)
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoachId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CoachId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for CoachId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}
