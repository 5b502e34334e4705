//! Debug logging of JSON request bodies, redacted

use axum::{
    body::{to_bytes, Body},
    extract::{MatchedPath, Request},
    http::header::CONTENT_TYPE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::Level;

use super::redact::redact_json;
use crate::error::AppError;

/// Same ceiling axum applies to `Json` bodies
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub async fn log_request_body(request: Request, next: Next) -> Response {
    if !tracing::enabled!(Level::DEBUG) || !is_json(&request) {
        return next.run(request).await;
    }

    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    let method = request.method().clone();

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Could not read request body for {} {}: {}", method, route, e);
            return AppError::BadRequest("request body too large or unreadable".to_string()).into_response();
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(mut payload) => {
            redact_json(&mut payload);
            tracing::debug!("{} {} body: {}", method, route, payload);
        }
        Err(_) => tracing::debug!("{} {} body: <{} bytes, not JSON>", method, route, bytes.len()),
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}
