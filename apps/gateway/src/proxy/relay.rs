//! Mapping an upstream response onto the browser-facing response.
//!
//! Error bodies from the backend look like `{"detail": "..."}`; the browser
//! always receives `{"error": "..."}`. Binary and event-stream bodies are
//! piped through chunk by chunk and never inspected.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::backend::BackendError;
use crate::errors::AppError;

/// Upstream status as an axum status code.
pub fn upstream_status(response: &reqwest::Response) -> StatusCode {
    StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)
}

/// Reads and parses the whole upstream body as JSON.
pub async fn read_json(response: reqwest::Response) -> Result<Value, BackendError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// The backend's `detail` message, or `fallback` when absent or not a string.
pub fn error_message(body: &Value, fallback: &str) -> String {
    match body.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        _ => fallback.to_string(),
    }
}

/// Builds the rejection for a non-success upstream response.
pub async fn rejection(response: reqwest::Response, fallback: &str) -> AppError {
    let status = upstream_status(&response);
    match read_json(response).await {
        Ok(body) => AppError::UpstreamRejected {
            status,
            message: error_message(&body, fallback),
        },
        Err(e) => e.into(),
    }
}

/// Parses a JSON upstream response, failing with the relayed status when the
/// backend did not succeed.
pub async fn json_body(response: reqwest::Response, fallback: &str) -> Result<Value, AppError> {
    if !response.status().is_success() {
        return Err(rejection(response, fallback).await);
    }
    Ok(read_json(response).await?)
}

/// Relays a JSON response with `success` as the status on the happy path.
pub async fn json(
    response: reqwest::Response,
    success: StatusCode,
    fallback: &str,
) -> Result<Response, AppError> {
    let body = json_body(response, fallback).await?;
    Ok((success, Json(body)).into_response())
}

/// Pipes a PDF download through without buffering.
pub async fn pdf(
    response: reqwest::Response,
    fallback: &str,
    default_filename: &str,
) -> Result<Response, AppError> {
    if !response.status().is_success() {
        return Err(rejection(response, fallback).await);
    }

    let disposition = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok())
        .map(Ok)
        .unwrap_or_else(|| {
            HeaderValue::from_str(&format!("attachment; filename=\"{default_filename}\""))
        })
        .map_err(anyhow::Error::from)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(response.bytes_stream()))
        .map_err(|e| AppError::Internal(e.into()))
}

/// Pipes a Server-Sent-Events stream through byte for byte.
pub async fn event_stream(response: reqwest::Response, fallback: &str) -> Result<Response, AppError> {
    if !response.status().is_success() {
        return Err(rejection(response, fallback).await);
    }

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .header("X-Accel-Buffering", "no")
        .body(Body::from_stream(response.bytes_stream()))
        .map_err(|e| AppError::Internal(e.into()))
}
