//! # EMCC Awards Directory Extraction
//!
//! The EMCC directory renders search results as a table with a fixed column
//! order: country, name, level, reference. Extraction locates the row
//! containing the queried EIA reference, preferring a real `<tr>` boundary
//! and falling back to a text window around the raw occurrence when the row
//! markup is missing or mangled.

use once_cell::sync::Lazy;
use regex::Regex;

use accredo_core::body::EmccLevel;
use accredo_core::EiaReference;

use super::{
    ceil_char_boundary, find_ci, floor_char_boundary, is_chrome_phrase, looks_like_person_name,
    plain_text, rfind_ci, text_segments, Candidate,
};

static CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<t[dh][^>]*>(.*?)</t[dh]>").expect("cell regex is valid"));

/// Bytes of context taken either side of the reference when no `<tr>`
/// boundary is found.
const FALLBACK_WINDOW: usize = 300;

/// Extract the candidate identity for `reference` from an EMCC results
/// page. Returns an empty list when the reference does not appear or the
/// surrounding markup fails the sanity checks; never errors.
pub fn extract(html: &str, reference: &EiaReference) -> Vec<Candidate> {
    let Some(position) = find_ci(html, reference.as_str(), 0) else {
        return Vec::new();
    };

    if let Some(candidate) = extract_from_row(html, position, reference) {
        return vec![candidate];
    }
    match extract_from_window(html, position, reference) {
        Some(candidate) => vec![candidate],
        None => Vec::new(),
    }
}

/// Preferred path: the `<tr>` enclosing the reference, with fixed column
/// positions.
fn extract_from_row(html: &str, position: usize, reference: &EiaReference) -> Option<Candidate> {
    let row_start = rfind_ci(html, "<tr", position)?;
    let row_end = find_ci(html, "</tr>", position)? + "</tr>".len();
    let row = &html[row_start..row_end];

    let cells: Vec<String> = CELL
        .captures_iter(row)
        .filter_map(|captures| captures.get(1))
        .map(|cell| plain_text(cell.as_str()))
        .collect();
    if cells.len() < 4 {
        return None;
    }

    // Fixed EMCC column order: country, name, level, reference.
    let country = cells[0].trim().to_string();
    let name = cells[1].trim().to_string();
    let level = cells[2].trim();
    let reference_cell = cells[3].trim();

    if !reference_cell.eq_ignore_ascii_case(reference.as_str()) {
        tracing::debug!(
            reference = reference.as_str(),
            found = reference_cell,
            "reference column does not match queried reference, discarding row"
        );
        return None;
    }
    if !accept_name(&name) {
        return None;
    }

    Some(Candidate {
        name,
        level: accept_level(level),
        country: (!country.is_empty()).then(|| country),
        profile_url: None,
    })
}

/// Fallback path: a generic context window around the raw text occurrence.
fn extract_from_window(html: &str, position: usize, reference: &EiaReference) -> Option<Candidate> {
    let start = floor_char_boundary(html, position.saturating_sub(FALLBACK_WINDOW));
    let end = ceil_char_boundary(html, position + FALLBACK_WINDOW);
    let segments = text_segments(&html[start..end]);

    let name = segments
        .iter()
        .map(|segment| segment.trim())
        .find(|segment| {
            accept_name(segment)
                && EmccLevel::parse_label(segment).is_none()
                && !segment.eq_ignore_ascii_case(reference.as_str())
        })?
        .to_string();

    // Longest labels first: "Senior Practitioner" must win over
    // "Practitioner".
    let mut levels = EmccLevel::ALL;
    levels.sort_by_key(|level| std::cmp::Reverse(level.label().len()));
    let window_text = segments.join(" ").to_lowercase();
    let level = levels
        .iter()
        .find(|level| window_text.contains(&level.label().to_lowercase()))
        .map(|level| level.label().to_string());

    Some(Candidate {
        name,
        level,
        country: None,
        profile_url: None,
    })
}

/// A name cell is accepted only if it is shaped like a person name and is
/// not navigation chrome.
fn accept_name(name: &str) -> bool {
    looks_like_person_name(name) && !is_chrome_phrase(name)
}

/// Level labels outside the known EMCC vocabulary are dropped.
fn accept_level(label: &str) -> Option<String> {
    EmccLevel::parse_label(label).map(|level| level.label().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> EiaReference {
        EiaReference::new("EIA20230480").expect("valid")
    }

    fn results_row(country: &str, name: &str, level: &str, reference: &str) -> String {
        format!(
            "<table><tr><th>Country</th><th>Name</th><th>Level</th><th>Ref</th></tr>\
             <tr><td>{country}</td><td>{name}</td><td>{level}</td><td>{reference}</td></tr></table>"
        )
    }

    #[test]
    fn extracts_row_with_fixed_columns() {
        let html = results_row("UK", "Carole Adams", "Senior Practitioner", "EIA20230480");
        let candidates = extract(&html, &reference());
        assert_eq!(
            candidates,
            vec![Candidate {
                name: "Carole Adams".into(),
                level: Some("Senior Practitioner".into()),
                country: Some("UK".into()),
                profile_url: None,
            }]
        );
    }

    #[test]
    fn reference_match_is_case_insensitive() {
        let html = results_row("UK", "Carole Adams", "Practitioner", "eia20230480");
        assert_eq!(extract(&html, &reference()).len(), 1);
    }

    #[test]
    fn missing_reference_yields_empty_list() {
        let html = results_row("UK", "Carole Adams", "Practitioner", "EIA999");
        assert!(extract(&html, &reference()).is_empty());
    }

    #[test]
    fn no_occurrence_never_errors() {
        assert!(extract("", &reference()).is_empty());
        assert!(extract("<html><body>nothing here</body></html>", &reference()).is_empty());
    }

    #[test]
    fn chrome_phrase_name_is_discarded() {
        let html = results_row("UK", "View Profile", "Practitioner", "EIA20230480");
        assert!(extract(&html, &reference()).is_empty());
    }

    #[test]
    fn malformed_name_is_discarded() {
        let html = results_row("UK", "CAROLE ADAMS 123", "Practitioner", "EIA20230480");
        assert!(extract(&html, &reference()).is_empty());
    }

    #[test]
    fn unknown_level_is_dropped_not_passed_through() {
        let html = results_row("UK", "Carole Adams", "Grand Wizard", "EIA20230480");
        let candidates = extract(&html, &reference());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].level, None);
    }

    #[test]
    fn window_fallback_when_no_row_markup() {
        let html = "<div>Accredited at Senior Practitioner level</div>\
                    <span>Carole Adams</span> <span>EIA20230480</span>";
        let candidates = extract(html, &reference());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Carole Adams");
        assert_eq!(candidates[0].level.as_deref(), Some("Senior Practitioner"));
    }

    #[test]
    fn window_fallback_rejects_chrome_only_context() {
        let html = "<nav>View Profile</nav><span>EIA20230480</span><nav>Contact</nav>";
        assert!(extract(html, &reference()).is_empty());
    }
}
