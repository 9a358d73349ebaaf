//! Instant resolution for calendar submission.
//!
//! A user-edited (date, time) pair is civil text; Google Calendar wants an
//! RFC 3339 instant with an explicit offset. Resolution runs through three
//! tiers, first success wins: a natural-language parse of the concatenated
//! pair, a strict "MM/DD/YYYY HH:mm" parse, and a last-resort lenient
//! construction in the server's own local zone. The target timezone comes
//! from configuration, never from request data.

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use log::{debug, warn};

use super::TemporalParser;

const STRICT_FORMAT: &str = "%m/%d/%Y %H:%M";

// Accepted by the local-zone fallback only.
const LENIENT_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%m/%d/%Y %I:%M %p", "%B %d, %Y %I:%M %p"];

/// Resolve a date string and a single time-of-day string to an
/// offset-qualified instant in `tz`.
///
/// Callers split any "start – end" range with [`split_time_range`] and
/// resolve each endpoint separately.
pub fn resolve_instant(
    date: &str,
    time: &str,
    tz: Tz,
    parser: &dyn TemporalParser,
) -> Result<DateTime<FixedOffset>> {
    let combined = format!("{} {}", date.trim(), time.trim());

    // Tier 1: natural-language parse, wall clock reinterpreted in `tz`.
    if let Some(candidate) = parser.parse(&combined)?.into_iter().next() {
        if let Some(instant) = qualify(candidate.start, tz) {
            debug!("instant for {:?} resolved by natural-language parse", combined);
            return Ok(instant);
        }
    }

    // Tier 2: strict format in `tz`.
    if let Ok(naive) = NaiveDateTime::parse_from_str(&combined, STRICT_FORMAT) {
        if let Some(instant) = qualify(naive, tz) {
            debug!("instant for {:?} resolved by strict parse", combined);
            return Ok(instant);
        }
    }

    // Tier 3: lenient construction in the server's local zone. Least
    // reliable, kept for backward compatibility with pre-timezone clients.
    for format in LENIENT_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&combined, format) {
            if let Some(instant) = Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.fixed_offset())
            {
                warn!("instant for {:?} fell back to server-local zone", combined);
                return Ok(instant);
            }
        }
    }

    Err(anyhow!("Unable to resolve '{}' to an instant", combined))
}

fn qualify(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<FixedOffset>> {
    // `earliest` settles DST-gap/fold ambiguity deterministically.
    tz.from_local_datetime(&naive).earliest().map(|dt| dt.fixed_offset())
}

/// Split a display time range like "7:00 PM – 8:00 PM" into its start and
/// optional end. A lone time comes back with no end.
pub fn split_time_range(time: &str) -> (String, Option<String>) {
    let mut parts = time.splitn(2, ['–', '—', '-']);
    let start = parts.next().unwrap_or("").trim().to_string();
    let end = parts.next().map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
    (start, end)
}
