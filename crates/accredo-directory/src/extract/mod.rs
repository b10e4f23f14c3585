//! # Directory Result Extraction
//!
//! Per-body HTML parsers that pull candidate identities out of a directory
//! results page. Extraction is regex/heuristic-driven against pages not
//! designed as an API; the contract is defined at the level of "what counts
//! as an accepted candidate", and periodic breakage of the heuristics is an
//! expected failure mode, not a bug to eliminate.
//!
//! Shared policy for both bodies:
//! - zero matches is success-shaped (empty list), never an error;
//! - a candidate whose "name" is UI chrome ("View Profile", "Contact", …)
//!   or fails the capitalized-words shape check is discarded, never
//!   returned as a false-positive name;
//! - level labels outside the body's known vocabulary are dropped.

pub mod emcc;
pub mod icf;

use once_cell::sync::Lazy;
use regex::Regex;

/// One identity scraped from a directory page. Transient: scored by the
/// orchestrator and discarded, never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Name as rendered on the directory.
    pub name: String,
    /// Accreditation level label, when one could be attached.
    pub level: Option<String>,
    /// Country or location text, when present.
    pub country: Option<String>,
    /// Directory profile URL, when present.
    pub profile_url: Option<String>,
}

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex is valid"));

/// `^[A-Z][a-z]+(\s[A-Z][a-z]+)*$` — the capitalized-words shape a rendered
/// person name is expected to have.
static NAME_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+(\s[A-Z][a-z]+)*$").expect("name shape regex is valid"));

/// UI chrome phrases that show up where a name is expected when the row
/// match slipped onto navigation markup.
const CHROME_PHRASES: &[&str] = &[
    "view profile",
    "read more",
    "find a coach",
    "credentialed coach finder",
    "search results",
    "privacy policy",
    "contact",
    "login",
    "log in",
    "register",
    "search",
    "next",
    "previous",
    "home",
    "menu",
];

/// Whether `text` matches the UI-chrome denylist. Multi-word phrases match
/// by containment; single words must match a whole token, so "Research
/// Smith" is not caught by "search".
pub(crate) fn is_chrome_phrase(text: &str) -> bool {
    let folded = text.trim().to_lowercase();
    CHROME_PHRASES.iter().any(|phrase| {
        if phrase.contains(' ') {
            folded.contains(phrase)
        } else {
            folded.split_whitespace().any(|token| token == *phrase)
        }
    })
}

/// Whether `text` has the shape of a rendered person name.
pub(crate) fn looks_like_person_name(text: &str) -> bool {
    NAME_SHAPE.is_match(text.trim())
}

/// Strip markup from an HTML fragment and return the non-empty text
/// segments, one per run of text between tags.
pub(crate) fn text_segments(fragment: &str) -> Vec<String> {
    TAG.replace_all(fragment, "\n")
        .split('\n')
        .map(|segment| decode_entities(segment.trim()))
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Markup stripped and whitespace collapsed into one line of text.
pub(crate) fn plain_text(fragment: &str) -> String {
    text_segments(fragment).join(" ")
}

/// Decode the handful of HTML entities the directories actually emit.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .trim()
        .to_string()
}

/// Case-insensitive ASCII search for `needle` in `haystack[from..]`,
/// returning an absolute byte offset. Tag names are ASCII, so offsets land
/// on character boundaries.
pub(crate) fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let pat = needle.as_bytes();
    if pat.is_empty() || from > hay.len() || hay.len() - from < pat.len() {
        return None;
    }
    (from..=hay.len() - pat.len())
        .find(|&i| hay[i..i + pat.len()].eq_ignore_ascii_case(pat))
}

/// Case-insensitive ASCII search for the last occurrence of `needle` that
/// starts before `end`.
pub(crate) fn rfind_ci(haystack: &str, needle: &str, end: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let pat = needle.as_bytes();
    let end = end.min(hay.len());
    if pat.is_empty() || end < pat.len() {
        return None;
    }
    (0..=end - pat.len())
        .rev()
        .find(|&i| hay[i..i + pat.len()].eq_ignore_ascii_case(pat))
}

/// Snap a byte offset down to the nearest character boundary.
pub(crate) fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Snap a byte offset up to the nearest character boundary.
pub(crate) fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrome_phrases_are_detected() {
        assert!(is_chrome_phrase("View Profile"));
        assert!(is_chrome_phrase("  LOGIN  "));
        assert!(is_chrome_phrase("Next"));
        assert!(!is_chrome_phrase("Carole Adams"));
        // Single-word phrases only match whole tokens.
        assert!(!is_chrome_phrase("Research Smith"));
    }

    #[test]
    fn person_name_shape() {
        assert!(looks_like_person_name("Carole Adams"));
        assert!(looks_like_person_name("Jo"));
        assert!(!looks_like_person_name("CAROLE ADAMS"));
        assert!(!looks_like_person_name("carole adams"));
        assert!(!looks_like_person_name("Carole  Adams B."));
        assert!(!looks_like_person_name("123"));
    }

    #[test]
    fn text_segments_strip_markup_and_entities() {
        let html = "<td> Jane&nbsp;Doe </td><td>Senior&nbsp;Practitioner</td>";
        assert_eq!(
            text_segments(html),
            vec!["Jane Doe".to_string(), "Senior Practitioner".to_string()]
        );
        assert_eq!(plain_text("<b>O&#39;Brien</b> &amp; Co"), "O'Brien & Co");
    }

    #[test]
    fn case_insensitive_byte_search() {
        let html = "<TR><td>x</td></tr>";
        assert_eq!(find_ci(html, "<tr", 0), Some(0));
        assert_eq!(find_ci(html, "</tr>", 0), Some(14));
        assert_eq!(rfind_ci(html, "<tr", 10), Some(0));
        assert_eq!(find_ci(html, "<table", 0), None);
    }

    #[test]
    fn boundary_snapping_handles_multibyte() {
        let text = "aé b";
        // Byte 2 is inside 'é'.
        assert_eq!(floor_char_boundary(text, 2), 1);
        assert_eq!(ceil_char_boundary(text, 2), 3);
        assert_eq!(floor_char_boundary(text, 100), text.len());
    }
}
