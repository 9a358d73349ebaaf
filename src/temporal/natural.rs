//! Rule-based natural language date/time recognition.
//!
//! This is the built-in [`TemporalParser`]: a regex scan over free-form text
//! that recognizes month-name dates, numeric dates, weekday names, clock
//! times and time ranges, and merges a date written next to a time into a
//! single candidate. Output order is the source order of the matches, and
//! everything is resolved against an explicit reference date so that the
//! same (reference, text) pair always produces the same candidates.

use anyhow::Result;
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, Weekday};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{TemporalCandidate, TemporalParser};

static MONTH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun)\.?,?\s+)?(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s*(\d{4}))?\b",
    )
    .unwrap()
});

static NUMERIC_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap());

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b").unwrap()
});

static TIME_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\s*(?:-|–|—|to|until)\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b",
    )
    .unwrap()
});

static TIME_SINGLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}):(\d{2})\s*(am|pm)?\b|\b(\d{1,2})\s*(am|pm)\b").unwrap()
});

// Gap allowed between a date and a following time for them to merge into
// one candidate: same line, separated only by punctuation or a connective.
static DATE_TIME_GAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[ \t,]*(?:at[ \t]+|from[ \t]+|@[ \t]*)?$").unwrap());

static TIME_DATE_GAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[ \t,]*(?:on[ \t]+)?$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    fn to_naive(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
            .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap())
    }
}

#[derive(Debug, Clone, Copy)]
enum Piece {
    Date { date: NaiveDate, certain: bool },
    Time { start: TimeOfDay, end: Option<TimeOfDay> },
}

#[derive(Debug, Clone, Copy)]
struct Span {
    lo: usize,
    hi: usize,
    piece: Piece,
}

/// Convert a 12-hour clock reading to 24-hour form. Hours without a
/// meridiem are taken as written (24-hour clock).
fn to_24_hour(hour: u32, meridiem: Option<&str>) -> u32 {
    match (hour, meridiem) {
        (12, Some(m)) if m.eq_ignore_ascii_case("am") => 0,
        (h, Some(m)) if m.eq_ignore_ascii_case("pm") && h < 12 => h + 12,
        (h, _) => h,
    }
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let key = if lower.len() >= 3 { &lower[..3] } else { return None };
    let month = match key {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn weekday_number(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// The occurrence of `target` on or after `reference` (same day counts).
fn weekday_on_or_after(reference: NaiveDate, target: Weekday) -> NaiveDate {
    let days = (target.num_days_from_monday() as i64
        - reference.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    reference + Duration::days(days)
}

fn overlaps(spans: &[Span], lo: usize, hi: usize) -> bool {
    spans.iter().any(|s| lo < s.hi && s.lo < hi)
}

fn parse_minute(m: Option<regex::Match<'_>>) -> u32 {
    m.map_or(0, |m| m.as_str().parse().unwrap_or(0))
}

/// Rule-based [`TemporalParser`] resolving implied components against a
/// fixed reference date.
pub struct RuleBasedTemporalParser {
    reference: NaiveDate,
}

impl RuleBasedTemporalParser {
    pub fn new(reference: NaiveDate) -> Self {
        Self { reference }
    }

    /// Parser anchored on the server's current date. The only
    /// non-deterministic constructor; extraction itself stays a pure
    /// function of (reference, text).
    pub fn for_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    fn collect_date_spans(&self, text: &str, spans: &mut Vec<Span>) {
        for caps in MONTH_DATE_RE.captures_iter(text) {
            let m = caps.get(0).unwrap();
            let month = caps.get(1).and_then(|c| month_number(c.as_str()));
            let day: Option<u32> = caps.get(2).and_then(|c| c.as_str().parse().ok());
            let year: i32 = caps
                .get(3)
                .and_then(|c| c.as_str().parse().ok())
                .unwrap_or_else(|| self.reference.year());
            if let (Some(month), Some(day)) = (month, day) {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    spans.push(Span {
                        lo: m.start(),
                        hi: m.end(),
                        piece: Piece::Date { date, certain: true },
                    });
                }
            }
        }

        for caps in NUMERIC_DATE_RE.captures_iter(text) {
            let m = caps.get(0).unwrap();
            if overlaps(spans, m.start(), m.end()) {
                continue;
            }
            let month: Option<u32> = caps[1].parse().ok();
            let day: Option<u32> = caps[2].parse().ok();
            let year: Option<i32> = caps[3].parse().ok();
            if let (Some(month), Some(day), Some(year)) = (month, day, year) {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    spans.push(Span {
                        lo: m.start(),
                        hi: m.end(),
                        piece: Piece::Date { date, certain: true },
                    });
                }
            }
        }

        for caps in ISO_DATE_RE.captures_iter(text) {
            let m = caps.get(0).unwrap();
            if overlaps(spans, m.start(), m.end()) {
                continue;
            }
            let year: Option<i32> = caps[1].parse().ok();
            let month: Option<u32> = caps[2].parse().ok();
            let day: Option<u32> = caps[3].parse().ok();
            if let (Some(year), Some(month), Some(day)) = (year, month, day) {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    spans.push(Span {
                        lo: m.start(),
                        hi: m.end(),
                        piece: Piece::Date { date, certain: true },
                    });
                }
            }
        }

        for caps in WEEKDAY_RE.captures_iter(text) {
            let m = caps.get(0).unwrap();
            if overlaps(spans, m.start(), m.end()) {
                continue;
            }
            if let Some(weekday) = weekday_number(&caps[1]) {
                spans.push(Span {
                    lo: m.start(),
                    hi: m.end(),
                    piece: Piece::Date {
                        date: weekday_on_or_after(self.reference, weekday),
                        certain: false,
                    },
                });
            }
        }
    }

    fn collect_time_spans(&self, text: &str, spans: &mut Vec<Span>) {
        for caps in TIME_RANGE_RE.captures_iter(text) {
            let m = caps.get(0).unwrap();
            if overlaps(spans, m.start(), m.end()) {
                continue;
            }
            let h1: u32 = match caps[1].parse() {
                Ok(h) => h,
                Err(_) => continue,
            };
            let h2: u32 = match caps[4].parse() {
                Ok(h) => h,
                Err(_) => continue,
            };
            let m1 = parse_minute(caps.get(2));
            let m2 = parse_minute(caps.get(5));
            // A meridiem written on only one endpoint applies to both.
            let mer1 = caps.get(3).or_else(|| caps.get(6)).map(|c| c.as_str());
            let mer2 = caps.get(6).or_else(|| caps.get(3)).map(|c| c.as_str());
            let start = TimeOfDay { hour: to_24_hour(h1, mer1), minute: m1 };
            let end = TimeOfDay { hour: to_24_hour(h2, mer2), minute: m2 };
            if start.hour > 23 || end.hour > 23 || start.minute > 59 || end.minute > 59 {
                continue;
            }
            spans.push(Span {
                lo: m.start(),
                hi: m.end(),
                piece: Piece::Time { start, end: Some(end) },
            });
        }

        for caps in TIME_SINGLE_RE.captures_iter(text) {
            let m = caps.get(0).unwrap();
            if overlaps(spans, m.start(), m.end()) {
                continue;
            }
            // Alternative 1: H:MM with optional meridiem; alternative 2: H + meridiem.
            let (hour, minute, meridiem) = if let Some(h) = caps.get(1) {
                (h.as_str().parse::<u32>(), parse_minute(caps.get(2)), caps.get(3))
            } else {
                (caps[4].parse::<u32>(), 0, caps.get(5))
            };
            let hour = match hour {
                Ok(h) => h,
                Err(_) => continue,
            };
            let time = TimeOfDay {
                hour: to_24_hour(hour, meridiem.map(|c| c.as_str())),
                minute,
            };
            if time.hour > 23 || time.minute > 59 {
                continue;
            }
            spans.push(Span { lo: m.start(), hi: m.end(), piece: Piece::Time { start: time, end: None } });
        }
    }

    /// Fold the ordered spans into candidates, merging a date adjacent to a
    /// time (in either order) into a single candidate.
    fn assemble(&self, text: &str, spans: &[Span]) -> Vec<TemporalCandidate> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < spans.len() {
            let span = spans[i];
            let next = spans.get(i + 1);
            match (span.piece, next.map(|n| n.piece)) {
                (Piece::Date { date, certain }, Some(Piece::Time { start, end }))
                    if gap_matches(text, span.hi, next.unwrap().lo, &DATE_TIME_GAP_RE) =>
                {
                    out.push(TemporalCandidate {
                        start: date.and_time(start.to_naive()),
                        end: end.map(|e| date.and_time(e.to_naive())),
                        day_certain: certain,
                        hour_certain: true,
                    });
                    i += 2;
                }
                (Piece::Time { start, end }, Some(Piece::Date { date, certain }))
                    if gap_matches(text, span.hi, next.unwrap().lo, &TIME_DATE_GAP_RE) =>
                {
                    out.push(TemporalCandidate {
                        start: date.and_time(start.to_naive()),
                        end: end.map(|e| date.and_time(e.to_naive())),
                        day_certain: certain,
                        hour_certain: true,
                    });
                    i += 2;
                }
                (Piece::Date { date, certain }, _) => {
                    // Implied time-of-day is noon.
                    out.push(TemporalCandidate {
                        start: date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()),
                        end: None,
                        day_certain: certain,
                        hour_certain: false,
                    });
                    i += 1;
                }
                (Piece::Time { start, end }, _) => {
                    out.push(TemporalCandidate {
                        start: self.reference.and_time(start.to_naive()),
                        end: end.map(|e| self.reference.and_time(e.to_naive())),
                        day_certain: false,
                        hour_certain: true,
                    });
                    i += 1;
                }
            }
        }
        out
    }
}

fn gap_matches(text: &str, lo: usize, hi: usize, re: &Regex) -> bool {
    text.get(lo..hi).is_some_and(|gap| re.is_match(gap))
}

impl TemporalParser for RuleBasedTemporalParser {
    fn parse(&self, text: &str) -> Result<Vec<TemporalCandidate>> {
        let mut spans = Vec::new();
        self.collect_date_spans(text, &mut spans);
        self.collect_time_spans(text, &mut spans);
        spans.sort_by_key(|s| s.lo);
        let candidates = self.assemble(text, &spans);
        debug!("temporal scan found {} candidate(s)", candidates.len());
        Ok(candidates)
    }
}
