//! Student profile and avatar upload.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::Response,
};
use bytes::{Bytes, BytesMut};
use reqwest::multipart::{Form, Part};
use tracing::debug;

use super::{relay, JsonBody};
use crate::auth::SessionToken;
use crate::backend::{BackendError, Method};
use crate::errors::AppError;
use crate::state::AppState;

pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Request body ceiling for the upload route. Larger than [`MAX_IMAGE_BYTES`]
/// so oversized images get a readable 400 instead of a bare 413.
pub const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

const TOO_LARGE: &str = "File size must be less than 2MB";
const BAD_TYPE: &str = "Only JPEG, PNG, and WebP images are allowed";

/// GET /api/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Response, AppError> {
    let response = state.backend.get("/profile", &token).await?;
    relay::json(response, StatusCode::OK, "Failed to fetch profile").await
}

/// POST /api/profile
pub async fn handle_create_profile(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    JsonBody(body): JsonBody,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .send_json(Method::POST, "/profile", Some(&token), Some(&body))
        .await?;
    relay::json(response, StatusCode::CREATED, "Failed to create profile").await
}

/// PUT /api/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    JsonBody(body): JsonBody,
) -> Result<Response, AppError> {
    let response = state
        .backend
        .send_json(Method::PUT, "/profile", Some(&token), Some(&body))
        .await?;
    relay::json(response, StatusCode::OK, "Failed to update profile").await
}

#[derive(Debug)]
struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Bytes,
}

fn form_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation(TOO_LARGE.to_string())
    } else {
        AppError::Validation(format!("Invalid form data: {}", err.body_text()))
    }
}

fn check_content_type(content_type: &str) -> Result<(), AppError> {
    if ALLOWED_IMAGE_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(AppError::Validation(BAD_TYPE.to_string()))
    }
}

/// Reads the `file` field, stopping as soon as it exceeds [`MAX_IMAGE_BYTES`].
async fn read_image(multipart: &mut Multipart) -> Result<ImageUpload, AppError> {
    while let Some(mut field) = multipart.next_field().await.map_err(form_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();

        let mut buf = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(form_error)? {
            if buf.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(AppError::Validation(TOO_LARGE.to_string()));
            }
            buf.extend_from_slice(&chunk);
        }
        check_content_type(&content_type)?;

        return Ok(ImageUpload {
            file_name,
            content_type,
            bytes: buf.freeze(),
        });
    }
    Err(AppError::Validation("No file provided".to_string()))
}

/// POST /api/profile/image
///
/// Validated locally, then forwarded as multipart `PUT /profile/image`.
pub async fn handle_upload_image(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    multipart: Result<Multipart, axum::extract::multipart::MultipartRejection>,
) -> Result<Response, AppError> {
    let mut multipart =
        multipart.map_err(|_| AppError::Validation("No file provided".to_string()))?;
    let upload = read_image(&mut multipart).await?;
    debug!(
        size = upload.bytes.len(),
        content_type = %upload.content_type,
        "Forwarding profile image"
    );

    let part = Part::bytes(upload.bytes.to_vec())
        .file_name(upload.file_name)
        .mime_str(&upload.content_type)
        .map_err(BackendError::Http)?;
    let form = Form::new().part("file", part);

    let response = state
        .backend
        .send_multipart(Method::PUT, "/profile/image", &token, form)
        .await?;
    relay::json(response, StatusCode::OK, "Failed to upload image").await
}
