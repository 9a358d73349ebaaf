//! Google Calendar insert collaborator.
//!
//! Thin client over the Calendar v3 events endpoint. The bearer token is
//! supplied per call by the HTTP boundary; this crate never performs the
//! OAuth consent flow itself.

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

/// Custom error type for calendar operations
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Missing access token")]
    MissingToken,
    #[error("Invalid date/time format: {0}")]
    InvalidDateTime(String),
    #[error("Google Calendar API error: {0}")]
    Api(String),
}

/// Event payload for insertion. Start and end are RFC 3339 instants with
/// explicit offsets, produced by the temporal normalizer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EventInsert {
    pub summary: String,
    pub start: String,
    pub end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventInsert {
    /// Body shape the Calendar v3 API expects.
    pub fn to_api_body(&self) -> Value {
        let mut body = serde_json::json!({
            "summary": self.summary,
            "start": { "dateTime": self.start },
            "end": { "dateTime": self.end },
        });
        if let Some(location) = &self.location {
            body["location"] = Value::String(location.clone());
        }
        if let Some(description) = &self.description {
            body["description"] = Value::String(description.clone());
        }
        body
    }
}

#[async_trait]
pub trait CalendarClient: Send + Sync {
    async fn insert_event(&self, token: &str, event: &EventInsert) -> Result<()>;
}

pub struct GoogleCalendarClient {
    client: Client,
    calendar_id: String,
}

impl GoogleCalendarClient {
    pub fn new(calendar_id: impl Into<String>) -> Self {
        Self { client: Client::new(), calendar_id: calendar_id.into() }
    }

    fn events_url(&self) -> String {
        format!(
            "https://www.googleapis.com/calendar/v3/calendars/{}/events",
            self.calendar_id
        )
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    async fn insert_event(&self, token: &str, event: &EventInsert) -> Result<()> {
        if token.is_empty() {
            return Err(CalendarError::MissingToken.into());
        }

        debug!("Inserting event '{}' into calendar '{}'", event.summary, self.calendar_id);

        let response = self
            .client
            .post(self.events_url())
            .bearer_auth(token)
            .json(&event.to_api_body())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Calendar insert failed with {}: {}", status, body);
            return Err(CalendarError::Api(status.to_string()).into());
        }

        info!("Created calendar event '{}'", event.summary);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_api_body_shape() {
        let event = EventInsert {
            summary: "Colloquium".to_string(),
            start: "2025-05-12T19:00:00-07:00".to_string(),
            end: "2025-05-12T20:00:00-07:00".to_string(),
            location: Some("Room 101, ESB".to_string()),
            description: None,
        };
        let body = event.to_api_body();
        assert_eq!(body["summary"], "Colloquium");
        assert_eq!(body["start"]["dateTime"], "2025-05-12T19:00:00-07:00");
        assert_eq!(body["end"]["dateTime"], "2025-05-12T20:00:00-07:00");
        assert_eq!(body["location"], "Room 101, ESB");
        assert!(body.get("description").is_none());
    }

    #[test]
    fn test_events_url_embeds_calendar_id() {
        let client = GoogleCalendarClient::new("primary");
        assert_eq!(
            client.events_url(),
            "https://www.googleapis.com/calendar/v3/calendars/primary/events"
        );
    }

    #[test]
    fn test_calendar_error_display() {
        assert_eq!(CalendarError::MissingToken.to_string(), "Missing access token");
        assert_eq!(
            CalendarError::InvalidDateTime("bad".to_string()).to_string(),
            "Invalid date/time format: bad"
        );
    }
}
