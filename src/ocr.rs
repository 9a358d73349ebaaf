//! OCR collaborator.
//!
//! The orchestrating caller owns a handle to an [`OcrClient`]; the
//! extraction core never sees it. The production implementation calls the
//! Google Vision `images:annotate` endpoint with TEXT_DETECTION. An image
//! with no recognizable text is a normal empty-string outcome, not an
//! error.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};
use std::env;

const VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

#[async_trait]
pub trait OcrClient: Send + Sync {
    async fn extract_text(&self, image: &[u8]) -> Result<String>;
}

pub struct VisionOcrClient {
    client: Client,
}

impl VisionOcrClient {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for VisionOcrClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrClient for VisionOcrClient {
    async fn extract_text(&self, image: &[u8]) -> Result<String> {
        let api_key = env::var("GOOGLE_VISION_API_KEY")
            .map_err(|_| anyhow!("GOOGLE_VISION_API_KEY environment variable not set"))?;

        debug!("Submitting {} byte image for text detection", image.len());

        let response = self
            .client
            .post(format!("{}?key={}", VISION_ENDPOINT, api_key))
            .json(&json!({
                "requests": [{
                    "image": { "content": BASE64.encode(image) },
                    "features": [{ "type": "TEXT_DETECTION" }]
                }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Vision API error: {}", response.status()));
        }

        let response_json: Value = response.json().await?;
        let result = &response_json["responses"][0];
        if let Some(message) = result["error"]["message"].as_str() {
            return Err(anyhow!("Vision API error: {}", message));
        }

        let text = result["textAnnotations"][0]["description"].as_str().unwrap_or("");
        info!("Vision OCR produced {} characters of text", text.len());
        Ok(text.to_string())
    }
}
