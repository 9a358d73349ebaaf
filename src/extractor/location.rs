//! Location resolution.
//!
//! Keyword vocabulary over venue, room, building, address and
//! virtual-meeting terms, plus the numeric room tokens 100-120 common on
//! campus flyers. The primary scan is a window around the anchor line; a
//! global sweep is the fallback so an out-of-window "Zoom meeting" line is
//! still found.

use once_cell::sync::Lazy;
use regex::Regex;

use super::lines::Line;

static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:room|rm|hall|auditorium|theat(?:er|re)|center|centre|building|bldg|library|lab|lounge|cafeteria|gym|campus|venue|location|address|street|avenue|ave|blvd|boulevard|suite|floor|zoom|webinar|webex|online|virtual|google meet|teams|1(?:0[0-9]|1[0-9]|20))\b",
    )
    .unwrap()
});

pub fn is_location_line(text: &str) -> bool {
    LOCATION_RE.is_match(text)
}

/// First keyword match in the window `anchor-2 ..= anchor+5` (clipped to
/// valid bounds, anchor 0 when unresolved), then first match anywhere, then
/// "".
pub fn resolve_location(lines: &[Line], anchor: Option<usize>) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let anchor = anchor.unwrap_or(0);
    let lo = anchor.saturating_sub(2);
    let hi = (anchor + 5).min(lines.len() - 1);
    for line in &lines[lo..=hi] {
        if is_location_line(&line.text) {
            return line.text.clone();
        }
    }
    lines
        .iter()
        .find(|l| is_location_line(&l.text))
        .map(|l| l.text.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::lines::normalize;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("Room 101, ESB", true)]
    #[test_case("Main Auditorium", true)]
    #[test_case("Zoom meeting, link in email", true)]
    #[test_case("119", true; "room token in range")]
    #[test_case("121", false; "room token out of range")]
    #[test_case("We have snacks", false; "ave inside a word")]
    #[test_case("Machine Learning Colloquium", false)]
    fn test_keyword_vocabulary(text: &str, expected: bool) {
        assert_eq!(is_location_line(text), expected);
    }

    #[test]
    fn test_window_match_wins_over_global() {
        let lines = normalize("Zoom link below\nTitle\nMonday, May 12\nRoom 101, ESB");
        // Anchor 2: window covers lines 0..=3, first keyword hit is line 0.
        assert_eq!(resolve_location(&lines, Some(2)), "Zoom link below");
    }

    #[test]
    fn test_global_fallback_outside_window() {
        let lines = normalize(
            "Title\nMonday, May 12\na\nb\nc\nd\ne\nf\nZoom meeting, link in email",
        );
        assert_eq!(resolve_location(&lines, Some(1)), "Zoom meeting, link in email");
    }

    #[test]
    fn test_window_clips_at_sequence_edges() {
        let lines = normalize("Room 101");
        assert_eq!(resolve_location(&lines, Some(0)), "Room 101");
        assert_eq!(resolve_location(&[], None), "");
    }

    #[test]
    fn test_no_match_yields_empty() {
        let lines = normalize("Title\nMonday, May 12\nfree pizza");
        assert_eq!(resolve_location(&lines, Some(1)), "");
    }
}
