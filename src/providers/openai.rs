//! OpenAI-backed extraction provider.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};
use std::env;

use super::{extraction_prompt, normalize_draft_times, DraftExtractor};
use crate::extractor::EventDraft;
use crate::temporal::RuleBasedTemporalParser;

const MODEL: &str = "gpt-4o";

pub struct OpenAiExtractor {
    client: Client,
}

impl OpenAiExtractor {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for OpenAiExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DraftExtractor for OpenAiExtractor {
    async fn extract(&self, text: &str) -> Result<EventDraft> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable not set"))?;

        debug!("Requesting event extraction from {}", MODEL);

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&json!({
                "model": MODEL,
                "messages": [
                    {
                        "role": "system",
                        "content": "You extract structured event fields from flyer text and answer with JSON only."
                    },
                    {
                        "role": "user",
                        "content": extraction_prompt(text)
                    }
                ],
                "temperature": 0.2,
                "max_tokens": 512
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("OpenAI API error: {}", response.status()));
        }

        let response_json: Value = response.json().await?;
        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("Invalid response format"))?;

        let mut draft = super::draft_from_json(content)?;
        normalize_draft_times(&mut draft, &RuleBasedTemporalParser::for_today())?;
        info!("OpenAI extraction produced draft titled {:?}", draft.title);
        Ok(draft)
    }
}
