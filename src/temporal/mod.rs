//! Temporal parsing for flyer text.
//!
//! This module defines the candidate model and the parser seam the
//! extraction core depends on, providing a unified interface for different
//! temporal parser implementations.

use anyhow::Result;
use chrono::NaiveDateTime;

pub mod natural;
pub mod normalizer;

pub use natural::RuleBasedTemporalParser;
pub use normalizer::{resolve_instant, split_time_range};

/// A date/time span recognized in free-form text, with certainty metadata
/// for its day and hour components.
///
/// `start` and `end` are civil (wall-clock) values; nothing here carries a
/// timezone until the calendar-submission path qualifies an instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalCandidate {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    /// The day of month was written out, not implied from the reference date.
    pub day_certain: bool,
    /// A clock time was written out, not implied.
    pub hour_certain: bool,
}

/// Parser seam for temporal parser implementations.
///
/// Implementations must return candidates in source order and report zero
/// matches as a normal `Ok` with an empty list, never as an error. The
/// extraction core is invoked both on full flyer text and on single lines.
pub trait TemporalParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<Vec<TemporalCandidate>>;
}
