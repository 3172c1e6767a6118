//! Login, registration, current user and logout.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};
use tracing::info;

use super::{relay, JsonBody};
use crate::auth::SessionToken;
use crate::backend::{BackendError, Method};
use crate::errors::AppError;
use crate::state::AppState;

/// Splits the backend's `{user, token}` auth payload.
fn split_auth_payload(mut data: Value) -> Result<(Value, String), BackendError> {
    let token = data
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or(BackendError::MissingField("token"))?;
    let user = data.get_mut("user").map(Value::take).unwrap_or(Value::Null);
    Ok((user, token))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let response = state
        .backend
        .send_json(Method::POST, "/auth/login", None, Some(&body))
        .await?;
    let data = relay::json_body(response, "Invalid credentials").await?;
    let (user, token) = split_auth_payload(data)?;

    info!("Session established via login");
    Ok((state.cookies.set(jar, token), Json(json!({ "user": user }))))
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, CookieJar, Json<Value>), AppError> {
    let response = state
        .backend
        .send_json(Method::POST, "/auth/register", None, Some(&body))
        .await?;
    let data = relay::json_body(response, "Registration failed").await?;
    let (user, token) = split_auth_payload(data)?;

    info!("Session established via registration");
    Ok((
        StatusCode::CREATED,
        state.cookies.set(jar, token),
        Json(json!({ "user": user })),
    ))
}

/// GET /api/auth/me
///
/// Any backend refusal is reported as 401, whatever status the backend used.
pub async fn handle_me(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<Value>, AppError> {
    let response = state.backend.get("/auth/me", &token).await?;
    let user = relay::json_body(response, "Not authenticated")
        .await
        .map_err(|e| match e {
            AppError::UpstreamRejected { message, .. } => AppError::UpstreamRejected {
                status: StatusCode::UNAUTHORIZED,
                message,
            },
            other => other,
        })?;
    Ok(Json(json!({ "user": user })))
}

/// POST /api/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    (state.cookies.clear(jar), Json(json!({ "success": true })))
}
