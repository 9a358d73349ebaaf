//! Description resolution.
//!
//! Everything below the anchor line that is not a location, attendee or
//! temporal line and is not the title itself reads as descriptive copy; the
//! first three such lines become the description.

use anyhow::Result;

use super::lines::Line;
use super::{attendees, location};
use crate::temporal::TemporalParser;

const MAX_DESCRIPTION_LINES: usize = 3;

pub fn resolve_description(
    lines: &[Line],
    anchor: Option<usize>,
    title: &str,
    parser: &dyn TemporalParser,
) -> Result<String> {
    let start = anchor.map_or(0, |a| a + 1);
    let mut picked: Vec<&str> = Vec::new();
    for line in lines.iter().skip(start) {
        if picked.len() == MAX_DESCRIPTION_LINES {
            break;
        }
        if location::is_location_line(&line.text) || attendees::is_attendee_line(&line.text) {
            continue;
        }
        if !parser.parse(&line.text)?.is_empty() {
            continue;
        }
        if line.text == title {
            continue;
        }
        picked.push(&line.text);
    }
    Ok(picked.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::lines::normalize;
    use crate::temporal::RuleBasedTemporalParser;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn parser() -> RuleBasedTemporalParser {
        RuleBasedTemporalParser::new(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
    }

    #[test]
    fn test_collects_first_three_qualifying_lines() {
        let lines = normalize(
            "Title\nMonday, May 12\nfirst part\nsecond part\nthird part\nfourth part",
        );
        let description = resolve_description(&lines, Some(1), "Title", &parser()).unwrap();
        assert_eq!(description, "first part second part third part");
    }

    #[test]
    fn test_excludes_keyword_temporal_and_title_lines() {
        let lines = normalize(
            "Title\nMonday, May 12\n7:00 PM sharp\nRoom 101\nHosted by: CS Dept\nTitle\nopen to the public",
        );
        let description = resolve_description(&lines, Some(1), "Title", &parser()).unwrap();
        assert_eq!(description, "open to the public");
    }

    #[test]
    fn test_no_anchor_starts_at_line_zero() {
        let lines = normalize("just words\nmore words");
        let description = resolve_description(&lines, None, "", &parser()).unwrap();
        assert_eq!(description, "just words more words");
    }

    #[test]
    fn test_nothing_qualifying_yields_empty() {
        let lines = normalize("Title\nMonday, May 12\nRoom 101");
        let description = resolve_description(&lines, Some(1), "Title", &parser()).unwrap();
        assert_eq!(description, "");
    }
}
