//! End-to-end integration tests

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

use crate::config::ServerConfig;
use crate::error::SourceError;
use crate::http::create_router;
use crate::integration::fixtures::FakeSource;
use crate::retry::RetryPolicy;
use crate::source::CaptionTrack;
use crate::state::AppState;
use crate::transcript::TranscriptService;

/// `https://youtu.be/abc123`, percent-encoded for a query string
const ENCODED_URL: &str = "https%3A%2F%2Fyoutu.be%2Fabc123";

fn app(source: FakeSource) -> Router {
    let service = TranscriptService::new(
        Arc::new(source),
        RetryPolicy::new(3, Duration::from_millis(1)),
        1,
    );
    let state = AppState::with_service(ServerConfig::default(), service);
    create_router(Arc::new(state))
}

/// English and Spanish captions
fn captioned() -> FakeSource {
    FakeSource::new()
        .with_tracks(vec![
            CaptionTrack::manual("en"),
            CaptionTrack::auto_generated("es"),
        ])
        .with_caption("en", FakeSource::vtt("Hello &amp; welcome"))
        .with_caption("es", FakeSource::vtt("Hola"))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

async fn get(app: Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_batch(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/transcripts/batch")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_root_banner() {
    let (status, body) = get_json(app(FakeSource::new()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "YouTube Transcript API (yt-dlp)");
    assert_eq!(
        body["usage"],
        "GET /transcript?url=<youtube_url>&lang=<language_code>"
    );
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json(app(FakeSource::new()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].as_f64().unwrap() >= 0.0);
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_transcript() {
    let uri = format!("/transcript?url={}&lang=en", ENCODED_URL);
    let (status, headers, body) = get(app(captioned()), &uri).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "video_id": "abc123",
            "language": "en",
            "transcript": "Hello & welcome",
            "available_languages": ["en", "es"],
        })
    );

    let request_id = headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_transcript_default_language() {
    let uri = format!("/transcript?url={}", ENCODED_URL);
    let (status, body) = get_json(app(captioned()), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "en");
}

#[tokio::test]
async fn test_transcript_requested_language() {
    let uri = format!("/transcript?url={}&lang=es", ENCODED_URL);
    let (status, body) = get_json(app(captioned()), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "es");
    assert_eq!(body["transcript"], "Hola");
}

#[tokio::test]
async fn test_transcript_missing_url() {
    let (status, body) = get_json(app(captioned()), "/transcript?lang=en").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_transcript_invalid_url() {
    let (status, body) = get_json(
        app(captioned()),
        "/transcript?url=https%3A%2F%2Fexample.com%2Fnot-youtube",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "Invalid YouTube URL" }));
}

#[tokio::test]
async fn test_transcript_no_languages() {
    let uri = format!("/transcript?url={}", ENCODED_URL);
    let (status, body) = get_json(app(FakeSource::new()), &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No subtitles available for this video");
}

#[tokio::test]
async fn test_transcript_video_unavailable() {
    let source = FakeSource::new().with_list_failures_for(
        "abc123",
        SourceError::VideoUnavailable("Private video".into()),
    );
    let uri = format!("/transcript?url={}", ENCODED_URL);
    let (status, body) = get_json(app(source), &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Video not accessible: Private video");
}

#[tokio::test]
async fn test_transcript_transient_failure() {
    let source = FakeSource::new().with_list_failures_for(
        "abc123",
        SourceError::TransientNetwork("Connection reset by peer".into()),
    );
    let uri = format!("/transcript?url={}", ENCODED_URL);
    let (status, body) = get_json(app(source), &uri).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body["detail"],
        "Network error, please try again: Connection reset by peer"
    );
}

#[tokio::test]
async fn test_transcript_recovers_after_transient_failure() {
    let source = captioned()
        .with_list_failures(vec![SourceError::TransientNetwork("timed out".into())]);
    let uri = format!("/transcript?url={}", ENCODED_URL);
    let (status, body) = get_json(app(source), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transcript"], "Hello & welcome");
}

#[tokio::test]
async fn test_transcript_unexpected_failure() {
    let source = FakeSource::new()
        .with_list_failures_for("abc123", SourceError::Unexpected("bad json".into()));
    let uri = format!("/transcript?url={}", ENCODED_URL);
    let (status, _) = get_json(app(source), &uri).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_download_srt() {
    let uri = format!("/transcript/download?url={}&format=srt", ENCODED_URL);
    let (status, headers, body) = get(app(captioned()), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/srt");
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=abc123_en.srt"
    );
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "1\n00:00:00,000 --> 00:00:02,000\nHello & welcome\n"
    );
}

#[tokio::test]
async fn test_download_defaults_to_txt() {
    let uri = format!("/transcript/download?url={}", ENCODED_URL);
    let (status, headers, body) = get(app(captioned()), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/plain");
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=abc123_en.txt"
    );
    assert_eq!(body, b"Hello & welcome");
}

#[tokio::test]
async fn test_download_vtt_uses_resolved_language() {
    let source = FakeSource::new()
        .with_tracks(vec![CaptionTrack::manual("de")])
        .with_caption("de", FakeSource::vtt("Hallo"));
    let uri = format!("/transcript/download?url={}&format=vtt&lang=fr", ENCODED_URL);
    let (status, headers, body) = get(app(source), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/vtt");
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=abc123_de.vtt"
    );
    assert_eq!(String::from_utf8(body).unwrap(), FakeSource::vtt("Hallo"));
}

#[tokio::test]
async fn test_download_invalid_format() {
    let uri = format!("/transcript/download?url={}&format=pdf", ENCODED_URL);
    let (status, body) = get_json(app(captioned()), &uri).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_languages() {
    let source = FakeSource::new().with_tracks(vec![
        CaptionTrack::auto_generated("fr"),
        CaptionTrack::manual("en"),
        CaptionTrack::auto_generated("en"),
    ]);
    let (status, body) = get_json(app(source), "/languages/abc123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "video_id": "abc123",
            "available_languages": [
                { "code": "en", "language": "en", "is_generated": false },
                { "code": "fr", "language": "fr", "is_generated": true },
            ],
        })
    );
}

#[tokio::test]
async fn test_languages_failure() {
    let source = FakeSource::new()
        .with_list_failures_for("abc123", SourceError::VideoUnavailable("gone".into()));
    let (status, body) = get_json(app(source), "/languages/abc123").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Error fetching available languages: Video not accessible: gone"
    );
}

#[tokio::test]
async fn test_batch_empty() {
    let (status, body) = post_batch(app(captioned()), r#"{"urls": []}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "total_requested": 0, "successful": 0, "failed": 0, "results": [] })
    );
}

#[tokio::test]
async fn test_batch_mixed() {
    let source = captioned().with_list_failures_for(
        "unreachable",
        SourceError::VideoUnavailable("Video unavailable".into()),
    );
    let request = json!({
        "urls": [
            "invalid_url",
            "https://youtu.be/unreachable",
            "https://www.youtube.com/watch?v=abc123",
        ],
        "language": "es",
    });
    let (status, body) = post_batch(app(source), &request.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_requested"], 3);
    assert_eq!(body["successful"], 1);
    assert_eq!(body["failed"], 2);

    let results = body["results"].as_array().unwrap();
    assert_eq!(
        results[0],
        json!({
            "url": "invalid_url",
            "success": false,
            "error": "Invalid YouTube URL: Invalid YouTube URL",
        })
    );
    assert_eq!(
        results[1],
        json!({
            "url": "https://youtu.be/unreachable",
            "video_id": "unreachable",
            "success": false,
            "error": "Video not found or unavailable: Video not accessible: Video unavailable",
        })
    );
    assert_eq!(
        results[2],
        json!({
            "url": "https://www.youtube.com/watch?v=abc123",
            "video_id": "abc123",
            "success": true,
            "transcript": "Hola",
            "language": "es",
            "available_languages": ["en", "es"],
        })
    );
}

#[tokio::test]
async fn test_batch_fetch_failure() {
    let source = FakeSource::new().with_tracks(vec![CaptionTrack::manual("en")]);
    let (status, body) =
        post_batch(app(source), r#"{"urls": ["https://youtu.be/abc123"]}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["failed"], 1);
    assert_eq!(
        body["results"][0]["error"],
        "Failed to download transcript: No subtitles found for this video"
    );
    assert_eq!(body["results"][0]["available_languages"], json!(["en"]));
}

#[tokio::test]
async fn test_batch_malformed_body() {
    let (status, body) = post_batch(app(captioned()), r#"{"urls": "not a list"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, _) = post_batch(app(captioned()), "{").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
