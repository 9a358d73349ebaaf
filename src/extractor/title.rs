//! Title resolution.
//!
//! The title is found positionally: locate the anchor line (the line
//! carrying the resolved date, or failing that the first weekday mention),
//! then walk upward looking for the closest line that reads like a title.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use super::lines::Line;
use crate::temporal::TemporalParser;

static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b").unwrap()
});

// Flyer boilerplate like "GUEST TALK" or "EVENTS" that still names the thing.
static TALK_EVENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)talk|event").unwrap());

static ALL_CAPS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z\s,]+$").unwrap());

/// Index of the anchor line: the first line containing the resolved date
/// literally, else the first line naming a weekday. `None` when neither
/// search hits.
pub fn find_anchor_line(lines: &[Line], date: &str) -> Option<usize> {
    if !date.is_empty() {
        if let Some(index) = lines.iter().position(|l| l.text.contains(date)) {
            return Some(index);
        }
    }
    lines.iter().position(|l| WEEKDAY_RE.is_match(&l.text))
}

/// Scan strictly above the anchor, closest line first. Falls back to the
/// first talk/event mention, then the first line, then "".
pub fn resolve_title(
    lines: &[Line],
    anchor: Option<usize>,
    parser: &dyn TemporalParser,
) -> Result<String> {
    if let Some(anchor) = anchor {
        for line in lines[..anchor].iter().rev() {
            if qualifies_as_title(&line.text, parser)? {
                return Ok(line.text.clone());
            }
        }
    }
    if let Some(line) = lines.iter().find(|l| TALK_EVENT_RE.is_match(&l.text)) {
        return Ok(line.text.clone());
    }
    Ok(lines.first().map(|l| l.text.clone()).unwrap_or_default())
}

fn qualifies_as_title(text: &str, parser: &dyn TemporalParser) -> Result<bool> {
    if text.split_whitespace().count() > 6 {
        return Ok(false);
    }
    if ALL_CAPS_RE.is_match(text) {
        return Ok(false);
    }
    if !text.chars().any(|c| c.is_alphabetic()) {
        return Ok(false);
    }
    Ok(parser.parse(text)?.is_empty())
}
