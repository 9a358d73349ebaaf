use anyhow::Result;
use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::Duration;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::calendar::{CalendarClient, CalendarError, EventInsert};
use crate::config::Config;
use crate::extractor::EventDraft;
use crate::ocr::OcrClient;
use crate::providers::DraftExtractor;
use crate::temporal::{resolve_instant, split_time_range, RuleBasedTemporalParser};

// API state that will be shared across handlers
pub struct ApiState {
    pub config: Config,
    pub ocr: Arc<dyn OcrClient>,
    pub calendar: Arc<dyn CalendarClient>,
    pub extractor: Arc<dyn DraftExtractor>,
}

// General API response
#[derive(Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub text: String,
    #[serde(flatten)]
    pub event: EventDraft,
}

#[derive(Debug, Deserialize)]
pub struct AddToCalendarRequest {
    pub title: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ApiResponse>) {
    (StatusCode::BAD_REQUEST, Json(ApiResponse { success: false, message: message.into() }))
}

fn internal_error(message: impl Into<String>) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse { success: false, message: message.into() }),
    )
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
}

// Upload an image, OCR it, and extract an event draft
async fn upload_handler(
    State(state): State<Arc<ApiState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, Json<ApiResponse>)> {
    let mut image: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Malformed multipart request: {}", e)))?
    {
        if field.name() == Some("image") {
            let data = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("Failed to read image field: {}", e)))?;
            image = Some(data.to_vec());
            break;
        }
    }

    let Some(image) = image else {
        return Err(bad_request("No image file uploaded."));
    };

    let text = state.ocr.extract_text(&image).await.map_err(|e| {
        error!("OCR error: {}", e);
        internal_error("Failed to process image.")
    })?;

    let event = state.extractor.extract(&text).await.map_err(|e| {
        error!("Extraction error: {}", e);
        internal_error("Failed to process image.")
    })?;

    Ok(Json(UploadResponse { text, event }))
}

// Add an edited event to the user's Google Calendar
async fn add_to_calendar_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(request): Json<AddToCalendarRequest>,
) -> Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)> {
    let Some(token) = bearer_token(&headers) else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse { success: false, message: "Missing access token.".to_string() }),
        ));
    };

    if request.title.is_empty() || request.date.is_empty() || request.time.is_empty() {
        return Err(bad_request("Missing required fields."));
    }

    let tz = state.config.calendar.tz().map_err(|e| {
        error!("Config error: {}", e);
        internal_error("Failed to add event to Google Calendar.")
    })?;

    let parser = RuleBasedTemporalParser::for_today();
    let (start_text, end_text) = split_time_range(&request.time);

    let invalid = |_| {
        let err = CalendarError::InvalidDateTime(format!("{} {}", request.date, request.time));
        bad_request(err.to_string())
    };
    let start = resolve_instant(&request.date, &start_text, tz, &parser).map_err(invalid)?;
    let end = match end_text {
        Some(end_text) => resolve_instant(&request.date, &end_text, tz, &parser).map_err(invalid)?,
        None => start + Duration::hours(1),
    };

    let event = EventInsert {
        summary: request.title,
        start: start.to_rfc3339(),
        end: end.to_rfc3339(),
        location: Some(request.location).filter(|s| !s.is_empty()),
        description: Some(request.description).filter(|s| !s.is_empty()),
    };

    match state.calendar.insert_event(token, &event).await {
        Ok(_) => Ok(Json(ApiResponse {
            success: true,
            message: "Event added to calendar".to_string(),
        })),
        Err(e) => {
            error!("Add to calendar error: {}", e);
            Err(internal_error("Failed to add event to Google Calendar."))
        }
    }
}

// Health check endpoint
async fn health_check() -> &'static str {
    "snapcal API is running"
}

pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/upload", post(upload_handler))
        .route("/api/add-to-calendar", post(add_to_calendar_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(state: ApiState, port: u16) -> Result<()> {
    let app = router(Arc::new(state));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("snapcal API listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
