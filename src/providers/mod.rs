//! Extraction providers.
//!
//! Every provider fulfils the same contract: free-form flyer text in, a
//! complete [`EventDraft`] out. The heuristic provider wraps the pure
//! extraction core and is the canonical default; the LLM providers are
//! alternative collaborators selected by configuration.

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

pub mod openai;
pub mod vertex;

use crate::config::{Config, ExtractorProvider};
use crate::extractor::{self, datetime, EventDraft};
use crate::temporal::{RuleBasedTemporalParser, TemporalParser};

/// Provider contract: extract a complete six-field draft from flyer text.
#[async_trait]
pub trait DraftExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<EventDraft>;
}

/// Provider factory keyed by configuration.
pub fn create_extractor(config: &Config) -> Arc<dyn DraftExtractor> {
    match config.extractor.provider {
        ExtractorProvider::Heuristic => Arc::new(HeuristicExtractor::new()),
        ExtractorProvider::Vertex => Arc::new(vertex::VertexExtractor::new()),
        ExtractorProvider::OpenAI => Arc::new(openai::OpenAiExtractor::new()),
    }
}

/// The deterministic heuristic pipeline behind the provider contract.
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DraftExtractor for HeuristicExtractor {
    async fn extract(&self, text: &str) -> Result<EventDraft> {
        let parser = RuleBasedTemporalParser::for_today();
        extractor::extract_event_fields(text, &parser)
    }
}

/// Prompt shared by the LLM providers.
pub(crate) fn extraction_prompt(text: &str) -> String {
    format!(
        "Extract the following event fields from the text below. Return a JSON object with \
         keys: title, date, time, location, description, attendees. If a field is missing, \
         use an empty string. Text: \"\"\"\n{}\n\"\"\"",
        text
    )
}

static CODE_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(?:json)?\s*|\s*```$").unwrap());

/// Models wrap JSON answers in Markdown fences often enough that both
/// providers strip them before decoding.
pub(crate) fn strip_code_fences(content: &str) -> String {
    CODE_FENCE_RE.replace_all(content.trim(), "").trim().to_string()
}

/// Decode a model's JSON answer into a draft. Unknown keys are ignored and
/// missing keys become empty fields.
pub(crate) fn draft_from_json(content: &str) -> Result<EventDraft> {
    let value: serde_json::Value = serde_json::from_str(&strip_code_fences(content))?;
    let field = |key: &str| value[key].as_str().unwrap_or("").trim().to_string();
    Ok(EventDraft {
        title: field("title"),
        date: field("date"),
        time: field("time"),
        location: field("location"),
        description: field("description"),
        attendees: field("attendees"),
    })
}

/// Re-parse the model's free-form date and time strings through the
/// temporal parser so LLM drafts render the same display formats as the
/// heuristic pipeline.
pub(crate) fn normalize_draft_times(
    draft: &mut EventDraft,
    parser: &dyn TemporalParser,
) -> Result<()> {
    if !draft.date.is_empty() {
        if let Some(candidate) = parser.parse(&draft.date)?.into_iter().next() {
            draft.date = datetime::format_display_date(candidate.start.date());
        }
    }
    if !draft.time.is_empty() {
        if let Some(candidate) = parser.parse(&draft.time)?.into_iter().next() {
            let mut time = datetime::format_display_time(candidate.start.time());
            if let Some(end) = candidate.end {
                time = format!("{} – {}", time, datetime::format_display_time(end.time()));
            }
            draft.time = time;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn parser() -> RuleBasedTemporalParser {
        RuleBasedTemporalParser::new(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_draft_from_json_fills_missing_fields() {
        let draft =
            draft_from_json("{\"title\": \"Mixer\", \"date\": \"May 12\"}").unwrap();
        assert_eq!(draft.title, "Mixer");
        assert_eq!(draft.date, "May 12");
        assert_eq!(draft.time, "");
        assert_eq!(draft.attendees, "");
    }

    #[test]
    fn test_draft_from_json_rejects_non_json() {
        assert!(draft_from_json("sorry, I cannot help").is_err());
    }

    #[test]
    fn test_normalize_draft_times() {
        let mut draft = EventDraft {
            date: "Monday, May 12".to_string(),
            time: "7pm to 9pm".to_string(),
            ..Default::default()
        };
        normalize_draft_times(&mut draft, &parser()).unwrap();
        assert_eq!(draft.date, "5/12/2025");
        assert_eq!(draft.time, "7:00 PM – 9:00 PM");
    }

    #[test]
    fn test_normalize_leaves_unparseable_strings_alone() {
        let mut draft = EventDraft {
            date: "sometime soon".to_string(),
            time: "late".to_string(),
            ..Default::default()
        };
        normalize_draft_times(&mut draft, &parser()).unwrap();
        assert_eq!(draft.date, "sometime soon");
        assert_eq!(draft.time, "late");
    }

    #[tokio::test]
    async fn test_heuristic_provider_returns_complete_draft() {
        let draft = HeuristicExtractor::new().extract("").await.unwrap();
        assert_eq!(draft, EventDraft::default());
    }
}
