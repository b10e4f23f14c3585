//! # ICF Directory Extraction
//!
//! The ICF directory has no fixed column order this crate can rely on, so
//! extraction scans anchors whose link text looks like a plausible person
//! name sharing at least one word with the search name, then inspects a
//! window of text around each hit for a credential-level token paired with
//! a date-range pattern, and for the claimed location.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    ceil_char_boundary, floor_char_boundary, is_chrome_phrase, plain_text, Candidate,
};

static ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a\b([^>]*)>(.*?)</a>"#).expect("anchor regex is valid"));

static HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).expect("href regex is valid"));

/// A credential token only counts when the surrounding text also carries a
/// date range — ICF renders credentials as e.g. "PCC (2019 - 2025)".
static CREDENTIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(ACC|PCC|MCC|ACTC)\b").expect("credential regex is valid"));

static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{4}\s*(?:-|–|to)\s*(?:\d{4}|present)\b").expect("date range regex is valid")
});

/// Bytes of raw context inspected before and after a name anchor.
const WINDOW_BEFORE: usize = 100;
const WINDOW_AFTER: usize = 450;

/// Most candidates worth scoring from a single page.
const MAX_CANDIDATES: usize = 10;

/// Extract plausible person-name candidates for `search_name` from an ICF
/// results page. When `expected_location` is given, a candidate whose
/// context window mentions one of its tokens gets the location attached —
/// the orchestrator treats that as the location-match signal.
///
/// Tolerates malformed HTML and zero matches; never errors.
pub fn extract(html: &str, search_name: &str, expected_location: Option<&str>) -> Vec<Candidate> {
    let search_words = folded_words(search_name);
    if search_words.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    for captures in ANCHOR.captures_iter(html) {
        let anchor = captures.get(0).expect("whole match always present");
        let attrs = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let text = plain_text(captures.get(2).map(|m| m.as_str()).unwrap_or_default());

        if !plausible_person_name(&text, &search_words) {
            continue;
        }
        if candidates.iter().any(|candidate| candidate.name == text) {
            continue;
        }

        // Credentials render after the name; scanning backwards would pick
        // up the previous result's credential line.
        let trailing = trailing_window(html, anchor.end());
        let level = credential_in_window(&trailing);

        let around = context_window(html, anchor.start(), anchor.end());
        let country = expected_location.filter(|location| location_in_window(&around, location));
        let profile_url = HREF
            .captures(attrs)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
            .filter(|href| href.starts_with("http"))
            .map(str::to_string);

        candidates.push(Candidate {
            name: text,
            level,
            country: country.map(str::to_string),
            profile_url,
        });
        if candidates.len() == MAX_CANDIDATES {
            break;
        }
    }
    candidates
}

/// Link text counts as a person-name candidate when it is 3–100 characters,
/// contains letters, is not a known heading/chrome phrase, and shares at
/// least one word with the search name.
fn plausible_person_name(text: &str, search_words: &[String]) -> bool {
    let length = text.chars().count();
    if !(3..=100).contains(&length) {
        return false;
    }
    if !text.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    if is_chrome_phrase(text) {
        return false;
    }
    let words = folded_words(text);
    words.iter().any(|word| search_words.contains(word))
}

/// Plain text of the raw HTML around an anchor.
fn context_window(html: &str, anchor_start: usize, anchor_end: usize) -> String {
    let start = floor_char_boundary(html, anchor_start.saturating_sub(WINDOW_BEFORE));
    let end = ceil_char_boundary(html, anchor_end.saturating_add(WINDOW_AFTER));
    plain_text(&html[start..end])
}

/// Plain text of the raw HTML following an anchor.
fn trailing_window(html: &str, anchor_end: usize) -> String {
    let end = ceil_char_boundary(html, anchor_end.saturating_add(WINDOW_AFTER));
    plain_text(&html[anchor_end..end])
}

/// Credential token in the window, accepted only alongside a date-range
/// pattern.
fn credential_in_window(window: &str) -> Option<String> {
    if !DATE_RANGE.is_match(window) {
        return None;
    }
    CREDENTIAL
        .captures(window)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_uppercase())
}

/// Whether any substantial token of the claimed location ("City, Country")
/// appears in the window.
fn location_in_window(window: &str, location: &str) -> bool {
    let folded = window.to_lowercase();
    location
        .split([',', '/'])
        .flat_map(str::split_whitespace)
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() >= 3)
        .any(|token| folded.contains(&token))
}

fn folded_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() > 1)
        .collect()
}
