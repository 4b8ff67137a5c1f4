//! HTTP request handlers
//!
//! Implements handlers for all transcript endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::error::{ErrorKind, TranscriptError};
use crate::language::LanguageInfo;
use crate::state::AppState;
use crate::subtitle::OutputFormat;
use crate::transcript::{BatchRequest, BatchResponse, Transcript, DEFAULT_LANGUAGE};
use crate::url::VideoId;

/// HTTP error type
#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    NotFound(String),
    Unavailable(String),
    Validation(String),
    InternalError(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            HttpError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            HttpError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<TranscriptError> for HttpError {
    fn from(err: TranscriptError) -> Self {
        let msg = err.to_string();
        match err.kind() {
            ErrorKind::InvalidInput => HttpError::BadRequest(msg),
            ErrorKind::NotFound => HttpError::NotFound(msg),
            ErrorKind::TransientNetwork => HttpError::Unavailable(msg),
            ErrorKind::Unexpected => HttpError::InternalError(msg),
        }
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        HttpError::Validation(rejection.body_text())
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::Validation(rejection.body_text())
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Query of `GET /transcript`
#[derive(Debug, Deserialize)]
pub struct TranscriptQuery {
    pub url: String,
    #[serde(default = "default_language")]
    pub lang: String,
}

/// Query of `GET /transcript/download`
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub url: String,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_language")]
    pub lang: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: f64,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub video_id: VideoId,
    pub available_languages: Vec<LanguageInfo>,
}

/// Service banner
/// GET /
pub async fn root() -> Json<serde_json::Value> {
    tracing::info!("Root endpoint accessed");
    Json(json!({
        "message": "YouTube Transcript API (yt-dlp)",
        "usage": "GET /transcript?url=<youtube_url>&lang=<language_code>",
    }))
}

/// Health check endpoint
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let uptime = (state.uptime_secs() * 100.0).round() / 100.0;
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Plain text transcript
/// GET /transcript?url=..&lang=..
pub async fn get_transcript(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TranscriptQuery>, QueryRejection>,
) -> Result<Json<Transcript>, HttpError> {
    let Query(query) = query?;
    let transcript = state.service.transcript(&query.url, &query.lang).await?;
    Ok(Json(transcript))
}

/// Captions as a file attachment
/// GET /transcript/download?url=..&format=..&lang=..
pub async fn download_transcript(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DownloadQuery>, QueryRejection>,
) -> Result<Response, HttpError> {
    let Query(query) = query?;
    let document = state
        .service
        .document(&query.url, &query.lang, query.format)
        .await?;

    let disposition = format!("attachment; filename={}", document.filename());
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(document.mime_type()),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| HttpError::InternalError(format!("Invalid filename: {}", e)))?,
    );

    Ok((headers, document.content).into_response())
}

/// Languages offered by a video
/// GET /languages/{video_id}
pub async fn get_languages(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Json<LanguagesResponse>, HttpError> {
    let video_id = VideoId::new(video_id);
    let available_languages = state.service.languages(&video_id).await.map_err(|e| {
        tracing::error!("Error fetching available languages for {}: {}", video_id, e);
        HttpError::InternalError(format!("Error fetching available languages: {}", e))
    })?;

    Ok(Json(LanguagesResponse {
        video_id,
        available_languages,
    }))
}

/// Several transcripts at once
/// POST /transcripts/batch
pub async fn batch_transcripts(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, HttpError> {
    let Json(request) = body?;
    let language = request.language.unwrap_or_else(default_language);
    Ok(Json(state.service.batch(request.urls, &language).await))
}
