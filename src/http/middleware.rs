//! HTTP middleware

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Response header carrying the request id
pub static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request logging middleware.
///
/// Logs method, URI, status and latency, and tags the response with a fresh
/// request id.
pub async fn request_logger(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = Uuid::new_v4().to_string();
    let start = Instant::now();

    let mut response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_success() {
        info!("[{}] {} {} {} in {:?}", request_id, method, uri, status, duration);
    } else {
        warn!("[{}] {} {} {} in {:?}", request_id, method, uri, status, duration);
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID.clone(), value);
    }

    response
}
