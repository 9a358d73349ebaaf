pub mod api_server;
pub mod calendar;
pub mod config;
pub mod extractor;
pub mod ocr;
pub mod providers;
pub mod temporal;

use anyhow::Result;
use log::*;
use std::sync::Arc;

use api_server::ApiState;
use calendar::GoogleCalendarClient;
use ocr::VisionOcrClient;

/// Load configuration, build the collaborator handles, and serve the API.
pub async fn run(port_override: Option<u16>) -> Result<()> {
    let config = config::Config::load()?;
    let port = port_override.unwrap_or(config.server.port);

    info!("Initializing snapcal with {:?} extractor", config.extractor.provider);

    let state = ApiState {
        ocr: Arc::new(VisionOcrClient::new()),
        calendar: Arc::new(GoogleCalendarClient::new(config.calendar.calendar_id.clone())),
        extractor: providers::create_extractor(&config),
        config,
    };

    api_server::run_server(state, port).await
}

pub fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

// Re-export commonly used types
pub use config::Config;
pub use extractor::{extract_event_fields, EventDraft};
pub use temporal::{RuleBasedTemporalParser, TemporalCandidate, TemporalParser};
