//! Heuristic event-field extraction.
//!
//! A single pass over OCR'd flyer text that always yields a complete
//! [`EventDraft`]. The pass is pure and synchronous: it owns its line
//! sequence and candidate list, shares nothing between calls, and the only
//! fallible step is the temporal parser invocation, whose error propagates
//! to the caller untouched.
//!
//! Stage order is fixed: date/time resolution first (it determines the
//! anchor line), then title, location, attendees, and description (which
//! also needs the resolved title for its exclusion rule).

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};

pub mod attendees;
pub mod datetime;
pub mod description;
pub mod lines;
pub mod location;
pub mod title;

use crate::temporal::TemporalParser;

/// The six-field structured event record. Every field is always present;
/// absence of information is an empty string, never a missing field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
    pub attendees: String,
}

/// Run the full extraction pass over raw flyer text.
pub fn extract_event_fields(text: &str, parser: &dyn TemporalParser) -> Result<EventDraft> {
    let lines = lines::normalize(text);
    let candidates = parser.parse(text)?;
    let (date, time) = datetime::resolve_date_time(text, &candidates);
    let anchor = title::find_anchor_line(&lines, &date);
    debug!("resolved date={:?} time={:?} anchor={:?}", date, time, anchor);

    let title = title::resolve_title(&lines, anchor, parser)?;
    let location = location::resolve_location(&lines, anchor);
    let attendees = attendees::resolve_attendees(&lines);
    let description = description::resolve_description(&lines, anchor, &title, parser)?;

    Ok(EventDraft { title, date, time, location, description, attendees })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::RuleBasedTemporalParser;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn parser() -> RuleBasedTemporalParser {
        RuleBasedTemporalParser::new(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
    }

    #[test]
    fn test_colloquium_flyer() {
        let text = "Machine Learning Colloquium\nMonday, May 12\n7:00 – 8:00 PM\nRoom 101, ESB";
        let draft = extract_event_fields(text, &parser()).unwrap();
        assert_eq!(draft.title, "Machine Learning Colloquium");
        assert_eq!(draft.date, "5/12/2025");
        assert_eq!(draft.time, "7:00 PM – 8:00 PM");
        assert_eq!(draft.location, "Room 101, ESB");
        assert_eq!(draft.description, "");
        assert_eq!(draft.attendees, "");
    }

    #[test]
    fn test_empty_input_yields_all_empty_fields() {
        let draft = extract_event_fields("", &parser()).unwrap();
        assert_eq!(draft, EventDraft::default());
    }

    #[test]
    fn test_draft_serializes_with_all_six_fields() {
        let value = serde_json::to_value(EventDraft::default()).unwrap();
        let object = value.as_object().unwrap();
        for key in ["title", "date", "time", "location", "description", "attendees"] {
            assert!(object.contains_key(key), "missing field {}", key);
        }
        assert_eq!(object.len(), 6);
    }
}
