//! Resume builder sessions, ATS scoring, templates and PDF download.

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

/// GET /api/resume/sessions
pub async fn handle_list_resume_sessions(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Response, AppError> {
    let response = state.backend.get("/resume/sessions", &token).await?;
    relay::json(response, StatusCode::OK, "Failed to fetch resume sessions").await
}

/// POST /api/resume/sessions
pub async fn handle_create_resume_session(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    JsonBody(body): JsonBody,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .send_json(Method::POST, "/resume/sessions", Some(&token), Some(&body))
        .await?;
    relay::json(response, StatusCode::CREATED, "Failed to create resume session").await
}

/// GET /api/resume/sessions/:id
pub async fn handle_get_resume_session(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    PathSegment(id): PathSegment,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .get(&format!("/resume/sessions/{id}"), &token)
        .await?;
    relay::json(response, StatusCode::OK, "Resume session not found").await
}

/// POST /api/resume/sessions/:id/message
pub async fn handle_send_resume_message(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    PathSegment(id): PathSegment,
    JsonBody(body): JsonBody,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .send_json(
            Method::POST,
            &format!("/resume/sessions/{id}/message"),
            Some(&token),
            Some(&body),
        )
        .await?;
    relay::event_stream(response, "Failed to send message").await
}

/// GET /api/resume/by-session/:session_id
pub async fn handle_get_resume_by_session(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    PathSegment(session_id): PathSegment,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .get(&format!("/resume/by-session/{session_id}"), &token)
        .await?;
    relay::json(response, StatusCode::OK, "Resume not found").await
}

/// GET /api/resume/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    PathSegment(id): PathSegment,
) -> Result<Response, AppError> {
    let response = state.backend.get(&format!("/resume/{id}"), &token).await?;
    relay::json(response, StatusCode::OK, "Resume not found").await
}

/// POST /api/resume/:id/ats-score
pub async fn handle_ats_score(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    PathSegment(id): PathSegment,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .send_json(
            Method::POST,
            &format!("/resume/{id}/ats-score"),
            Some(&token),
            None,
        )
        .await?;
    relay::json(response, StatusCode::OK, "Failed to compute ATS score").await
}

/// PATCH /api/resume/:id/template
pub async fn handle_update_template(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    PathSegment(id): PathSegment,
    JsonBody(body): JsonBody,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .send_json(
            Method::PATCH,
            &format!("/resume/{id}/template"),
            Some(&token),
            Some(&body),
        )
        .await?;
    relay::json(response, StatusCode::OK, "Failed to update template").await
}

/// GET /api/resume/:id/download
pub async fn handle_download_resume(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    PathSegment(id): PathSegment,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .get(&format!("/resume/{id}/download"), &token)
        .await?;
    relay::pdf(response, "Download failed", "resume.pdf").await
}
