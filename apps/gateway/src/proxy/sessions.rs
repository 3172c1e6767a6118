//! AI interview sessions, including the streamed chat turn.

use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
};

use super::{relay, JsonBody, PathSegment};
use crate::auth::SessionToken;
use crate::backend::Method;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/sessions
pub async fn handle_list_sessions(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Response, AppError> {
    let response = state.backend.get("/sessions", &token).await?;
    relay::json(response, StatusCode::OK, "Failed to fetch sessions").await
}

/// POST /api/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    JsonBody(body): JsonBody,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .send_json(Method::POST, "/sessions", Some(&token), Some(&body))
        .await?;
    relay::json(response, StatusCode::CREATED, "Failed to create session").await
}

/// GET /api/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    PathSegment(id): PathSegment,
) -> Result<Response, AppError> {
    let response = state.backend.get(&format!("/sessions/{id}"), &token).await?;
    relay::json(response, StatusCode::OK, "Session not found").await
}

/// POST /api/sessions/:id/message
///
/// The reply is a Server-Sent-Events stream relayed without re-framing.
pub async fn handle_send_message(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    PathSegment(id): PathSegment,
    JsonBody(body): JsonBody,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .send_json(
            Method::POST,
            &format!("/sessions/{id}/message"),
            Some(&token),
            Some(&body),
        )
        .await?;
    relay::event_stream(response, "Failed to send message").await
}

/// POST /api/sessions/:id/end
pub async fn handle_end_session(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    PathSegment(id): PathSegment,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .send_json(Method::POST, &format!("/sessions/{id}/end"), Some(&token), None)
        .await?;
    relay::json(response, StatusCode::OK, "Failed to end session").await
}

/// GET /api/sessions/:id/analysis
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    PathSegment(id): PathSegment,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .get(&format!("/sessions/{id}/analysis"), &token)
        .await?;
    relay::json(response, StatusCode::OK, "Analysis not found").await
}

/// GET /api/sessions/:id/report
pub async fn handle_download_report(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    PathSegment(id): PathSegment,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .get(&format!("/sessions/{id}/report"), &token)
        .await?;
    relay::pdf(response, "Report download failed", "report.pdf").await
}
