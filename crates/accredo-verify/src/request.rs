//! Typed inputs for the four verification entry points.
//!
//! These are internal pipeline inputs, already past transport-level
//! deserialization; the service layer owns the wire DTOs and converts into
//! these.

use accredo_core::{CoachId, IcfLevel};

/// Verify an EMCC award from a bare EIA reference number.
#[derive(Debug, Clone)]
pub struct EmccReferenceRequest {
    pub coach_id: CoachId,
    /// Name the coach claims to hold the award under.
    pub full_name: String,
    /// Raw EIA reference as submitted, validated by the pipeline.
    pub eia_number: String,
}

/// Verify an EMCC award from a pasted directory search-result URL.
#[derive(Debug, Clone)]
pub struct EmccUrlRequest {
    pub coach_id: CoachId,
    pub full_name: String,
    /// Raw search-result URL as submitted.
    pub profile_url: String,
}

/// Verify an ICF credential from a pasted directory search-result URL.
#[derive(Debug, Clone)]
pub struct IcfUrlRequest {
    pub coach_id: CoachId,
    pub full_name: String,
    /// Raw search-result URL as submitted.
    pub profile_url: String,
    /// Location the coach practices in; part of the cache key and the
    /// blended score.
    pub location: String,
    /// Credential level the coach claims to hold.
    pub claimed_level: IcfLevel,
}

/// Verify an ICF credential from the claimed name alone, with the search
/// URL built server-side.
#[derive(Debug, Clone)]
pub struct IcfNameRequest {
    pub coach_id: CoachId,
    pub full_name: String,
    pub claimed_level: IcfLevel,
    /// Optional location; when absent the blended score leans harder on the
    /// name component.
    pub location: Option<String>,
}
