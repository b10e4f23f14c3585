//! # Name Similarity Scoring
//!
//! Edit-distance-based fuzzy comparison used everywhere two names must be
//! compared. The score is the basis for every accept/reject decision
//! downstream, so it is pure, deterministic, and has no tie-break behavior —
//! callers choose thresholds.

/// Minimum similarity between the claimed name and a matched directory name
/// for a verification to be accepted (cache hits and live EMCC matches).
pub const NAME_ACCEPT_THRESHOLD: f64 = 0.85;

/// Minimum name similarity for an ICF candidate to be considered at all.
/// ICF has no unique reference number, so weaker matches are expected and
/// flagged rather than discarded silently.
pub const ICF_CANDIDATE_FLOOR: f64 = 0.70;

/// Blended-confidence bar an ICF candidate must clear to be verified
/// outright. Between [`ICF_CANDIDATE_FLOOR`] and this value the attempt is
/// downgraded to pending manual review, not rejected.
pub const ICF_BLENDED_ACCEPT: f64 = 0.85;

/// Similarity of two strings in `[0, 1]`:
/// `1 - levenshtein(a, b) / max(len(a), len(b))`, lengths in characters.
///
/// Two empty strings are defined as a perfect match (1.0) to avoid division
/// by zero. Callers are responsible for case-folding; use
/// [`name_similarity`] when comparing human names.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b);
    1.0 - distance as f64 / max_len as f64
}

/// [`similarity`] over case-folded, whitespace-normalized names.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    similarity(&fold_name(a), &fold_name(b))
}

/// Lowercase and collapse internal whitespace runs to single spaces.
fn fold_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert a `[0, 1]` score to the 0–100 integer confidence reported in
/// verdicts.
pub fn confidence(score: f64) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}
