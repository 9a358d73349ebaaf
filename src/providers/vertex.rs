//! Gemini-backed extraction provider.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};
use std::env;

use super::{extraction_prompt, normalize_draft_times, DraftExtractor};
use crate::extractor::EventDraft;
use crate::temporal::RuleBasedTemporalParser;

const MODEL: &str = "gemini-2.0-flash";

pub struct VertexExtractor {
    client: Client,
}

impl VertexExtractor {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for VertexExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DraftExtractor for VertexExtractor {
    async fn extract(&self, text: &str) -> Result<EventDraft> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow!("GEMINI_API_KEY environment variable not set"))?;

        debug!("Requesting event extraction from {}", MODEL);

        let response = self
            .client
            .post(format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
                MODEL, api_key
            ))
            .json(&json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": extraction_prompt(text) }] }
                ],
                "generationConfig": {
                    "temperature": 0.2,
                    "maxOutputTokens": 512
                }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Gemini API error: {}", response.status()));
        }

        let response_json: Value = response.json().await?;
        let content = response_json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow!("Invalid response format"))?;

        let mut draft = super::draft_from_json(content)?;
        normalize_draft_times(&mut draft, &RuleBasedTemporalParser::for_today())?;
        info!("Gemini extraction produced draft titled {:?}", draft.title);
        Ok(draft)
    }
}
