//! Date/time resolution over the scanned temporal candidates.
//!
//! Three ordered tiers, tried in sequence, first success wins:
//! an explicit certain-day/certain-hour range among the candidates, a raw
//! text regex sweep for a bare time range, and finally the first candidate
//! taken as a single instant. Each tier is an independent attempt function
//! rather than a branch of one conditional chain.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::temporal::TemporalCandidate;

// Bare clock range in flyer text, e.g. "7-8PM" or "7:00 – 8:00 pm".
static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*[-–—]\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b")
        .unwrap()
});

struct Resolved {
    date: Option<String>,
    time: Option<String>,
}

type Tier = fn(&str, &[TemporalCandidate]) -> Option<Resolved>;

const TIERS: [(&str, Tier); 3] = [
    ("explicit range", tier_explicit_range),
    ("regex range", tier_regex_range),
    ("single instant", tier_single_instant),
];

/// Resolve the display date and time for a piece of flyer text. Either
/// returned string may be empty when no tier produced it.
pub fn resolve_date_time(text: &str, candidates: &[TemporalCandidate]) -> (String, String) {
    for (name, tier) in TIERS {
        if let Some(resolved) = tier(text, candidates) {
            debug!("date/time resolved by {} tier", name);
            return (resolved.date.unwrap_or_default(), resolved.time.unwrap_or_default());
        }
    }
    (String::new(), String::new())
}

/// en-US short calendar date, e.g. "5/12/2025".
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// 12-hour clock reading, e.g. "7:00 PM".
pub fn format_display_time(time: NaiveTime) -> String {
    let meridiem = if time.hour() < 12 { "AM" } else { "PM" };
    let hour = match time.hour() % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour, time.minute(), meridiem)
}

fn format_display_range(start: NaiveTime, end: NaiveTime) -> String {
    format!("{} – {}", format_display_time(start), format_display_time(end))
}

fn tier_explicit_range(_text: &str, candidates: &[TemporalCandidate]) -> Option<Resolved> {
    let candidate =
        candidates.iter().find(|c| c.hour_certain && c.day_certain && c.end.is_some())?;
    let end = candidate.end.expect("filtered on end presence");
    Some(Resolved {
        date: Some(format_display_date(candidate.start.date())),
        time: Some(format_display_range(candidate.start.time(), end.time())),
    })
}

fn tier_regex_range(text: &str, candidates: &[TemporalCandidate]) -> Option<Resolved> {
    for caps in RANGE_RE.captures_iter(text) {
        let h1: u32 = caps[1].parse().ok()?;
        let h2: u32 = caps[3].parse().ok()?;
        let m1: u32 = caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let m2: u32 = caps.get(4).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        // Meridiem defaults to PM and applies identically to both ends; no
        // cross-midnight inference.
        let meridiem = caps.get(5).map_or("pm", |m| m.as_str());
        let start = NaiveTime::from_hms_opt(to_24_hour(h1, meridiem), m1, 0);
        let end = NaiveTime::from_hms_opt(to_24_hour(h2, meridiem), m2, 0);
        if let (Some(start), Some(end)) = (start, end) {
            // The date was never set by this tier's own match; borrow it
            // from the first candidate with a certain day, if any.
            let date = candidates
                .iter()
                .find(|c| c.day_certain)
                .map(|c| format_display_date(c.start.date()));
            return Some(Resolved { date, time: Some(format_display_range(start, end)) });
        }
    }
    None
}

fn tier_single_instant(_text: &str, candidates: &[TemporalCandidate]) -> Option<Resolved> {
    let candidate = candidates.first()?;
    Some(Resolved {
        date: Some(format_display_date(candidate.start.date())),
        time: Some(format_display_time(candidate.start.time())),
    })
}

fn to_24_hour(hour: u32, meridiem: &str) -> u32 {
    match (hour, meridiem.to_lowercase().as_str()) {
        (12, "am") => 0,
        (h, "pm") if h < 12 => h + 12,
        (h, _) => h,
    }
}
