//! Attendee resolution.
//!
//! A small set of attendee-introducing phrases selects the line; a trailing
//! capture after the phrase pulls out just the names when they follow on
//! the same line.

use once_cell::sync::Lazy;
use regex::Regex;

use super::lines::Line;

// Bare "by" only counts with a colon; the phrase forms carry their own "by".
static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:with|hosted\s+by|presented\s+by|featuring|speakers?|panel|attendees|guests|by:)",
    )
    .unwrap()
});

static CAPTURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:with|hosted\s+by|presented\s+by|featuring|speakers?|panel|attendees|guests|by):?\s*(.+)",
    )
    .unwrap()
});

pub fn is_attendee_line(text: &str) -> bool {
    KEYWORD_RE.is_match(text)
}

/// First keyword-matching line; the trimmed remainder after the keyword
/// when present, otherwise the whole line. "" when nothing matches.
pub fn resolve_attendees(lines: &[Line]) -> String {
    let Some(line) = lines.iter().find(|l| is_attendee_line(&l.text)) else {
        return String::new();
    };
    CAPTURE_RE
        .captures(&line.text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|rest| !rest.is_empty())
        .unwrap_or_else(|| line.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::lines::normalize;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("Hosted by: Dr. Ada Lovelace", "Dr. Ada Lovelace")]
    #[test_case("Speaker: Jane Doe", "Jane Doe")]
    #[test_case("Presented by the ACM chapter", "the ACM chapter")]
    #[test_case("Dinner with the Dean", "the Dean")]
    #[test_case("Featuring: The Quartet", "The Quartet")]
    fn test_trailing_capture(line: &str, expected: &str) {
        let lines = normalize(line);
        assert_eq!(resolve_attendees(&lines), expected);
    }

    #[test]
    fn test_keyword_without_remainder_returns_full_line() {
        let lines = normalize("All welcome\nGuests");
        assert_eq!(resolve_attendees(&lines), "Guests");
    }

    #[test]
    fn test_first_matching_line_is_selected() {
        let lines = normalize("Panel discussion to follow\nHosted by: CS Dept");
        assert_eq!(resolve_attendees(&lines), "discussion to follow");
    }

    #[test]
    fn test_bare_by_needs_a_colon() {
        let lines = normalize("Stop by the office");
        assert_eq!(resolve_attendees(&lines), "");
    }

    #[test]
    fn test_no_match_yields_empty() {
        assert_eq!(resolve_attendees(&normalize("Room 101\n7:00 PM")), "");
        assert_eq!(resolve_attendees(&[]), "");
    }
}
